//! Frame staging.
//!
//! - `store`: Frame store over a flat word region, sequential loading, sealing
//! - `source`: Byte-stream collaborators (host files, solid colour patterns)

mod source;
mod store;

pub use source::{FRAME_PATH_CAPACITY, FramePath, FrameSource, SolidColor, SolidPattern, SourceProvider, frame_path, pixel_word};
pub use store::{Frame, FrameStore, LoadedFrames};
