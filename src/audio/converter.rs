//! PCM to WAV converter

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use crate::audio::{PcmFormat, WavHeader, HEADER_LEN};
use crate::error::{Pcm2WavError, Result};

/// Outcome of a successful file conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub pcm_bytes: u64,
    pub total_bytes: u64,
    pub duration_secs: f64,
}

/// Header for a payload of `pcm_len` bytes in the fixed output format.
pub fn wav_header(pcm_len: u64) -> WavHeader {
    WavHeader::new(&PcmFormat::default(), pcm_len)
}

/// Write header and payload to `writer`, returning the number of bytes written.
pub fn write_wav<W: Write>(pcm: &[u8], writer: &mut W) -> Result<u64> {
    let pcm_len = pcm.len() as u64;
    if pcm_len > u32::MAX as u64 {
        warn!("PCM payload of {} bytes exceeds the 32-bit WAV size fields, sizes will wrap", pcm_len);
    }

    let header = wav_header(pcm_len);
    debug!(
        "WAV header: riff_size={} data_size={} byte_rate={} block_align={}",
        header.riff_size, header.data.chunk_size, header.format.byte_rate, header.format.block_align
    );

    header.write_to(writer)?;
    writer.write_all(pcm)?;
    writer.flush()?;

    Ok(HEADER_LEN as u64 + pcm_len)
}

pub fn pcm_to_wav_bytes(pcm: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm.len());
    buffer.extend_from_slice(&wav_header(pcm.len() as u64).to_bytes());
    buffer.extend_from_slice(pcm);
    buffer
}

/// Check that `wav_path` holds exactly the header and payload length written for `pcm_len` bytes.
///
/// Only the header bytes are compared, so odd-length payloads that `hound` refuses still verify.
pub fn verify_wav_file<P: AsRef<Path>>(wav_path: P, pcm_len: u64) -> Result<()> {
    let wav_path = wav_path.as_ref();
    let mut file = File::open(wav_path)?;

    let file_len = file.metadata()?.len();
    let expected_len = HEADER_LEN as u64 + pcm_len;
    if file_len != expected_len {
        return Err(Pcm2WavError::wav(format!(
            "{} is {} bytes, expected {}", wav_path.display(), file_len, expected_len
        )));
    }

    let mut header = [0u8; HEADER_LEN];
    file.read_exact(&mut header)?;
    if header != wav_header(pcm_len).to_bytes() {
        return Err(Pcm2WavError::wav(format!(
            "{} has an unexpected WAV header", wav_path.display()
        )));
    }

    debug!("Verified header and length of {}", wav_path.display());
    Ok(())
}

/// Convert `pcm_path` into a WAV file at `wav_path` with default options.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(pcm_path: P, wav_path: Q) -> Result<ConversionReport> {
    Converter::default().convert(pcm_path, wav_path)
}

#[derive(Debug, Clone)]
pub struct Converter {
    overwrite: bool,
    create_dirs: bool,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            overwrite: true,
            create_dirs: false,
        }
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Truncate an existing destination instead of failing.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Create missing parent directories of the destination.
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(&self, pcm_path: P, wav_path: Q) -> Result<ConversionReport> {
        let pcm_path = pcm_path.as_ref();
        let wav_path = wav_path.as_ref();

        // The source must open before the destination is touched.
        let mut source = File::open(pcm_path)
            .map_err(|e| Pcm2WavError::source_open(pcm_path, e))?;
        let mut pcm = Vec::new();
        source.read_to_end(&mut pcm)?;
        drop(source);

        debug!("Read {} PCM bytes from {}", pcm.len(), pcm_path.display());

        let file = self.create_destination(wav_path)?;
        let mut writer = BufWriter::new(file);
        let total_bytes = write_wav(&pcm, &mut writer)?;

        let pcm_bytes = pcm.len() as u64;
        let duration_secs = PcmFormat::default().duration_secs(pcm_bytes);

        info!(
            "Converted {} -> {} ({} bytes, {:.3}s)",
            pcm_path.display(), wav_path.display(), total_bytes, duration_secs
        );

        Ok(ConversionReport {
            input_path: pcm_path.to_path_buf(),
            output_path: wav_path.to_path_buf(),
            pcm_bytes,
            total_bytes,
            duration_secs,
        })
    }

    fn create_destination(&self, path: &Path) -> Result<File> {
        if self.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Pcm2WavError::destination_create(path, e))?;
            }
        }

        let mut options = OpenOptions::new();
        options.write(true);
        if self.overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        options.open(path).map_err(|e| Pcm2WavError::destination_create(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::WavInfo;
    use tempfile::TempDir;

    fn sample_pcm(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn test_bytes_layout() {
        let pcm = sample_pcm(100);
        let wav = pcm_to_wav_bytes(&pcm);

        assert_eq!(wav.len(), 44 + 100);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 136);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 100);
        assert_eq!(&wav[44..], &pcm[..]);
    }

    #[test]
    fn test_write_wav_matches_bytes() {
        let pcm = sample_pcm(10);
        let mut out = Vec::new();
        let written = write_wav(&pcm, &mut out).unwrap();
        assert_eq!(written, 54);
        assert_eq!(out, pcm_to_wav_bytes(&pcm));
    }

    #[test]
    fn test_convert_file() {
        let temp_dir = TempDir::new().unwrap();
        let pcm_path = temp_dir.path().join("speech.pcm");
        let wav_path = temp_dir.path().join("speech.wav");
        let pcm = sample_pcm(32000);
        std::fs::write(&pcm_path, &pcm).unwrap();

        let report = convert(&pcm_path, &wav_path).unwrap();
        assert_eq!(report.pcm_bytes, 32000);
        assert_eq!(report.total_bytes, 32044);
        assert!((report.duration_secs - 1.0).abs() < 1e-9);

        let wav = std::fs::read(&wav_path).unwrap();
        assert_eq!(wav.len(), 44 + pcm.len());
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 32000);
        assert_eq!(&wav[44..], &pcm[..]);

        let info = WavInfo::from_file(&wav_path).unwrap();
        assert!(info.matches(&PcmFormat::default()));
        assert_eq!(info.total_samples, 16000);
    }

    #[test]
    fn test_convert_odd_length_input() {
        let temp_dir = TempDir::new().unwrap();
        let pcm_path = temp_dir.path().join("odd.pcm");
        let wav_path = temp_dir.path().join("odd.wav");
        std::fs::write(&pcm_path, [7u8, 8, 9]).unwrap();

        let report = convert(&pcm_path, &wav_path).unwrap();
        assert_eq!(report.total_bytes, 47);

        let wav = std::fs::read(&wav_path).unwrap();
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 39);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 3);
        assert_eq!(&wav[44..], &[7u8, 8, 9]);

        assert!(verify_wav_file(&wav_path, 3).is_ok());
        // hound will not read a data chunk that is not a whole number of samples
        assert!(WavInfo::from_file(&wav_path).is_err());
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let wav_path = temp_dir.path().join("out.wav");
        std::fs::write(&wav_path, pcm_to_wav_bytes(&sample_pcm(10))).unwrap();

        assert!(verify_wav_file(&wav_path, 10).is_ok());
        assert!(matches!(verify_wav_file(&wav_path, 12), Err(Pcm2WavError::Wav { .. })));

        let mut corrupted = pcm_to_wav_bytes(&sample_pcm(10));
        corrupted[24] ^= 0xFF;
        std::fs::write(&wav_path, corrupted).unwrap();
        assert!(matches!(verify_wav_file(&wav_path, 10), Err(Pcm2WavError::Wav { .. })));
    }

    #[test]
    fn test_convert_empty_input() {
        let temp_dir = TempDir::new().unwrap();
        let pcm_path = temp_dir.path().join("empty.pcm");
        let wav_path = temp_dir.path().join("empty.wav");
        std::fs::write(&pcm_path, b"").unwrap();

        let report = convert(&pcm_path, &wav_path).unwrap();
        assert_eq!(report.total_bytes, 44);

        let wav = std::fs::read(&wav_path).unwrap();
        assert_eq!(wav.len(), 44);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 0);
    }

    #[test]
    fn test_missing_source_leaves_destination_alone() {
        let temp_dir = TempDir::new().unwrap();
        let pcm_path = temp_dir.path().join("missing.pcm");
        let wav_path = temp_dir.path().join("out.wav");

        let err = convert(&pcm_path, &wav_path).unwrap_err();
        assert!(matches!(err, Pcm2WavError::SourceOpen { .. }));
        assert!(!wav_path.exists());

        std::fs::write(&wav_path, b"keep me").unwrap();
        let err = convert(&pcm_path, &wav_path).unwrap_err();
        assert!(matches!(err, Pcm2WavError::SourceOpen { .. }));
        assert_eq!(std::fs::read(&wav_path).unwrap(), b"keep me");
    }

    #[test]
    fn test_unwritable_destination() {
        let temp_dir = TempDir::new().unwrap();
        let pcm_path = temp_dir.path().join("in.pcm");
        std::fs::write(&pcm_path, sample_pcm(4)).unwrap();
        let wav_path = temp_dir.path().join("no_such_dir").join("out.wav");

        let err = convert(&pcm_path, &wav_path).unwrap_err();
        assert!(matches!(err, Pcm2WavError::DestinationCreate { .. }));
    }

    #[test]
    fn test_create_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let pcm_path = temp_dir.path().join("in.pcm");
        std::fs::write(&pcm_path, sample_pcm(8)).unwrap();
        let wav_path = temp_dir.path().join("nested").join("dir").join("out.wav");

        Converter::new().create_dirs(true).convert(&pcm_path, &wav_path).unwrap();
        assert_eq!(std::fs::metadata(&wav_path).unwrap().len(), 52);
    }

    #[test]
    fn test_overwrite_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let pcm_path = temp_dir.path().join("in.pcm");
        let wav_path = temp_dir.path().join("out.wav");
        std::fs::write(&pcm_path, sample_pcm(2)).unwrap();
        std::fs::write(&wav_path, vec![0xAA; 500]).unwrap();

        convert(&pcm_path, &wav_path).unwrap();
        assert_eq!(std::fs::metadata(&wav_path).unwrap().len(), 46);
    }

    #[test]
    fn test_no_overwrite_refuses_existing() {
        let temp_dir = TempDir::new().unwrap();
        let pcm_path = temp_dir.path().join("in.pcm");
        let wav_path = temp_dir.path().join("out.wav");
        std::fs::write(&pcm_path, sample_pcm(2)).unwrap();
        std::fs::write(&wav_path, b"existing").unwrap();

        let err = Converter::new().overwrite(false).convert(&pcm_path, &wav_path).unwrap_err();
        assert!(matches!(err, Pcm2WavError::DestinationCreate { .. }));
        assert_eq!(std::fs::read(&wav_path).unwrap(), b"existing");
    }
}
