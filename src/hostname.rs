// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs;

const FALLBACK_HOSTNAME: &str = "localhost";

/// Supplies the name of the host the generator runs on.
pub trait Hostname: Send + Sync {
    fn get(&self) -> String;
}

/// Reads the host name from the `HOSTNAME` environment variable, then
/// `/etc/hostname`, falling back to `"localhost"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl Hostname for SystemHostname {
    fn get(&self) -> String {
        if let Ok(name) = std::env::var("HOSTNAME")
            && !name.trim().is_empty()
        {
            return name.trim().to_owned();
        }

        if let Ok(name) = fs::read_to_string("/etc/hostname")
            && !name.trim().is_empty()
        {
            return name.trim().to_owned();
        }

        FALLBACK_HOSTNAME.to_owned()
    }
}

/// A fixed host name.
#[derive(Debug, Clone)]
pub struct StaticHostname(pub String);

impl StaticHostname {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Hostname for StaticHostname {
    fn get(&self) -> String {
        self.0.clone()
    }
}
