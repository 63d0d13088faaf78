//! Frame files on the debug host, read through semihosting.

use core::ffi::CStr;

use heapless::Vec;
use lcd_player::frames::{FRAME_PATH_CAPACITY, frame_path};
use lcd_player::{FrameSource, SourceError, SourceProvider};
use semihosting::fs::File;
use semihosting::io::Read;

/// Opens `/mnt/host/gif/typing{i}.bin` on the host for frame `i`.
pub struct HostFs;

/// One open host file.
pub struct HostFile(File);

impl SourceProvider for HostFs {
    type Source = HostFile;

    fn open(
        &mut self,
        index: usize,
    ) -> Result<HostFile, SourceError> {
        let path = frame_path(index);

        let mut bytes: Vec<u8, { FRAME_PATH_CAPACITY + 1 }> = Vec::new();
        bytes.extend_from_slice(path.as_bytes()).map_err(|_| SourceError::Open)?;
        bytes.push(0).map_err(|_| SourceError::Open)?;
        let path = CStr::from_bytes_with_nul(&bytes).map_err(|_| SourceError::Open)?;

        match File::open(path) {
            Ok(file) => Ok(HostFile(file)),
            Err(_) => {
                lcd_player::log_error!("Cannot open host file for frame {}", index);
                Err(SourceError::Open)
            }
        }
    }
}

impl FrameSource for HostFile {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, SourceError> {
        self.0.read(buf).map_err(|_| SourceError::Read)
    }
}
