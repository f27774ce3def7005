// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "completion/mod.rs"]
pub mod completion;
