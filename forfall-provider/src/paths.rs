#![allow(dead_code)]

use std::{fs::create_dir_all, path::PathBuf};

#[cfg(not(test))]
pub fn config_dir() -> PathBuf {
    let path = dirs::home_dir().unwrap().join(".config").join("forfall");
    create_dir_all(&path).unwrap();
    path
}

#[cfg(test)]
pub fn config_dir() -> PathBuf {
    let path = PathBuf::from("./test_dir/");
    create_dir_all(&path).unwrap();
    path
}
