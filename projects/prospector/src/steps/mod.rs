pub mod clay;
pub mod github;
pub mod leads;
pub mod output;
