pub mod education;
pub mod experience;
pub mod ranking;
pub mod role;
pub mod scoring;
pub mod skills;
pub mod weights;
