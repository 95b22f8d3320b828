//! Small, deterministic media files for end-to-end runs.

use std::fs;
use std::path::{Path, PathBuf};

/// 8x8 PNG filled with `color`. Same color, same bytes.
pub fn png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(8, 8, image::Rgb(color))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

/// 64x64 PNG whose image data spans most of the file.
pub fn gradient_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_fn(64, 64, |x, y| image::Rgb([x as u8, y as u8, 7]))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

/// 8x8 baseline JPEG filled with `color`.
pub fn jpeg(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(8, 8, image::Rgb(color))
        .save_with_format(&path, image::ImageFormat::Jpeg)
        .unwrap();
    path
}

/// Tagless MPEG-1 Layer III stream of silent frames.
pub fn mp3(dir: &Path, name: &str) -> PathBuf {
    const FRAME_LEN: usize = 417;
    let mut data = Vec::with_capacity(FRAME_LEN * 16);
    for _ in 0..16 {
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        data.extend_from_slice(&frame);
    }
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

/// A file with a supported extension and garbage content.
pub fn garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"this is not media at all").unwrap();
    path
}

/// Copy `src` byte for byte to `dir/name`.
pub fn copy(src: &Path, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::copy(src, &path).unwrap();
    path
}

/// Sorted file names directly inside `dir`; empty if it does not exist.
pub fn names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Serializes tests that read or write `MEDIASWEEP_*` variables.
pub static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Hold [`ENV_MUTEX`], recovering from a poisoned lock.
pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}
