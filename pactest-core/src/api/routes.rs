macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Liveness probe.
pub const UP: &str = "/up";

/// Raw PAC content, served with the PAC mime type so engines can fetch it.
pub const PAC_CONTENT: &str = "/pac/{uid}";

/// Path of the raw content endpoint for one PAC.
pub fn pac_content_path(uid: &str) -> String {
    format!("/pac/{uid}")
}

/// Versioned API route definitions shared across PAC test services
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod pac {
        pub const COLLECTION: &str = v1_path!("/pac");
        pub const ITEM: &str = v1_path!("/pac/{uid}");

        pub fn item_path(uid: &str) -> String {
            format!("{}/{uid}", COLLECTION)
        }
    }

    pub mod eval {
        pub const INLINE: &str = v1_path!("/eval");
        pub const BY_UID: &str = v1_path!("/eval/{uid}");

        pub fn by_uid_path(uid: &str) -> String {
            format!("{}/{uid}", INLINE)
        }
    }

    pub mod engines {
        pub const COLLECTION: &str = v1_path!("/engines");
    }
}
