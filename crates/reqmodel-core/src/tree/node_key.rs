//! Synthetic node key minting
//!
//! Keys are `<owner>/<family>/<n>` with `n` counted from zero per flatten
//! call. They only have to be unique within an owner; nothing parses them.

/// Per-invocation key counter
#[derive(Debug)]
pub struct NodeKeyMinter<'a> {
    owner_key: &'a str,
    family: &'static str,
    next: u64,
}

impl<'a> NodeKeyMinter<'a> {
    pub fn new(owner_key: &'a str, family: &'static str) -> Self {
        Self {
            owner_key,
            family,
            next: 0,
        }
    }

    /// Mint the next key in pre-order
    pub fn mint(&mut self) -> String {
        let key = format!("{}/{}/{}", self.owner_key, self.family, self.next);
        self.next += 1;
        key
    }

    /// Number of keys minted so far
    pub fn minted(&self) -> u64 {
        self.next
    }
}
