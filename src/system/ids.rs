use nix::unistd::{Gid, Uid, User};
use tracing::debug;

/// Numeric ids of the user running the wizard, used to prefill PUID/PGID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIds {
    pub uid: u32,
    pub gid: u32,
    pub username: Option<String>,
}

impl HostIds {
    pub fn puid(&self) -> String {
        self.uid.to_string()
    }

    pub fn pgid(&self) -> String {
        self.gid.to_string()
    }

    /// Root ids are never a sensible container owner
    pub fn is_root(&self) -> bool {
        self.uid == 0
    }
}

pub fn current_ids() -> HostIds {
    let uid = Uid::current();
    let gid = Gid::current();
    let username = User::from_uid(uid).ok().flatten().map(|u| u.name);
    debug!("Detected host ids uid={} gid={} user={:?}", uid, gid, username);
    HostIds {
        uid: uid.as_raw(),
        gid: gid.as_raw(),
        username,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_process() {
        let ids = current_ids();
        assert_eq!(ids.uid, Uid::current().as_raw());
        assert_eq!(ids.puid(), ids.uid.to_string());
    }
}
