mod governance;

pub use governance::govern_request;
