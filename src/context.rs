use crate::{character::Character, rules::RuleTables, settings::Settings};

/// What a screen may see and touch while handling a key or rendering.
#[derive(Debug)]
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub rules: &'a RuleTables,
    // The only mutable handle to the ledger; screens go through its methods.
    pub character: &'a mut Option<Character>,
}
