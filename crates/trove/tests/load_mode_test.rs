//! Loading with a fixed `IS_DEV` from an override file.
//!
//! Kept in its own test binary: the override file writes `IS_DEV` into the
//! process environment, which every other load would then see.

use std::env;
use std::io::Write;

use tempfile::NamedTempFile;

use trove::constants::{MODE_DEV, PROTO_HTTP};
use trove::SettingsStore;

#[test]
fn test_dev_flag_from_override_file() {
    env::remove_var("IS_DEV");
    env::remove_var("SERVER_IS_LVE");

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"IS_DEV=true\n").unwrap();
    file.flush().unwrap();

    let settings = SettingsStore::load_from_path(file.path()).unwrap();
    assert!(settings.is_development());
    assert!(!settings.is_production());
    assert_eq!(settings.server_is(), MODE_DEV);
    assert_eq!(settings.proto(), PROTO_HTTP);
}
