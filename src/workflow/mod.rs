pub mod classify;
pub mod describe;
pub mod split;
