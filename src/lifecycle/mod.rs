pub mod permissions;
pub mod transitions;
