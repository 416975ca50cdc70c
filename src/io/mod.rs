// Purpose - external interfaces: audio devices and audio files

pub mod driver;
pub mod wav;

pub use driver::{AudioDriver, CpalDriver, OfflineDriver};
pub use wav::{load_wav, write_wav};
