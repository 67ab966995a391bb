pub mod profile_info;
pub mod result;

pub use profile_info::{ProfileInfo, ProfileInfoBuilder};
pub use result::ProfileResult;
