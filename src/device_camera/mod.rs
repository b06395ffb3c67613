pub mod impl_fake;
pub mod impl_frame_directory;
pub mod interface;
