pub mod intake;
pub mod jotform;
