//! One-shot background loading of textures and fonts.
//!
//! Each asset loads on its own thread and is delivered once over a channel.
//! The frame loop drains the channel and hands results to
//! [`ClockView::apply`](crate::ClockView::apply), which fills an
//! [`AssetSlot`] at most once.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tilt_clock_fonts::{FontError, StrokeFont};

use crate::texture::Texture;

const WOOD_SIZE: u32 = 256;
const ENVIRONMENT_SIZE: (u32, u32) = (256, 128);

/// Errors raised while loading an asset.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Font(#[from] FontError),
}

/// Where each asset comes from. `None` selects the built-in version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetSources {
    pub backdrop: Option<PathBuf>,
    pub environment: Option<PathBuf>,
    pub font: Option<PathBuf>,
}

/// A finished load.
#[derive(Debug)]
pub enum LoadedAsset {
    Backdrop(Result<Texture, AssetError>),
    Environment(Result<Texture, AssetError>),
    Font(Result<StrokeFont, AssetError>),
}

/// Holds an asset that arrives later, or learns that it never will.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AssetSlot<T> {
    #[default]
    Pending,
    Ready(T),
    Failed,
}

impl<T> AssetSlot<T> {
    /// Settle a pending slot. Returns false if it was already settled.
    pub fn fill(&mut self, value: Option<T>) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = match value {
            Some(value) => AssetSlot::Ready(value),
            None => AssetSlot::Failed,
        };
        true
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetSlot::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AssetSlot::Ready(_))
    }
}

/// Receiving end of the asset threads.
#[derive(Debug)]
pub struct AssetLoader {
    rx: Receiver<LoadedAsset>,
}

impl AssetLoader {
    /// Start loading every asset in the background.
    pub fn spawn(sources: AssetSources) -> Self {
        let (tx, rx) = mpsc::channel();

        let AssetSources {
            backdrop,
            environment,
            font,
        } = sources;

        spawn_load(&tx, move || LoadedAsset::Backdrop(load_backdrop(backdrop.as_deref())));
        spawn_load(&tx, move || {
            LoadedAsset::Environment(load_environment(environment.as_deref()))
        });
        spawn_load(&tx, move || LoadedAsset::Font(load_font(font.as_deref())));

        Self { rx }
    }

    /// Everything that finished since the last call.
    pub fn poll(&self) -> Vec<LoadedAsset> {
        self.rx.try_iter().collect()
    }
}

fn spawn_load(tx: &Sender<LoadedAsset>, load: impl FnOnce() -> LoadedAsset + Send + 'static) {
    let tx = tx.clone();
    thread::spawn(move || {
        // The view may be gone by the time a slow load finishes.
        let _ = tx.send(load());
    });
}

fn load_image(path: &Path) -> Result<Texture, AssetError> {
    Texture::open(path).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })
}

fn load_backdrop(path: Option<&Path>) -> Result<Texture, AssetError> {
    match path {
        Some(path) => load_image(path),
        None => Ok(Texture::wood_laminate(WOOD_SIZE)),
    }
}

fn load_environment(path: Option<&Path>) -> Result<Texture, AssetError> {
    match path {
        Some(path) => load_image(path),
        None => Ok(Texture::studio_environment(
            ENVIRONMENT_SIZE.0,
            ENVIRONMENT_SIZE.1,
        )),
    }
}

fn load_font(path: Option<&Path>) -> Result<StrokeFont, AssetError> {
    match path {
        Some(path) => Ok(StrokeFont::load(path)?),
        None => Ok(StrokeFont::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn collect(loader: &AssetLoader) -> Vec<LoadedAsset> {
        (0..3)
            .filter_map(|_| loader.rx.recv_timeout(Duration::from_secs(10)).ok())
            .collect()
    }

    #[test]
    fn test_slot_fills_once() {
        let mut slot = AssetSlot::Pending;
        assert!(slot.fill(Some(1)));
        assert!(!slot.fill(Some(2)));
        assert!(!slot.fill(None));
        assert_eq!(slot.get(), Some(&1));
    }

    #[test]
    fn test_failed_slot_stays_failed() {
        let mut slot: AssetSlot<u8> = AssetSlot::Pending;
        assert!(slot.fill(None));
        assert_eq!(slot, AssetSlot::Failed);
        assert!(!slot.fill(Some(3)));
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_builtin_assets_load() {
        let loader = AssetLoader::spawn(AssetSources::default());
        let loaded = collect(&loader);
        assert_eq!(loaded.len(), 3);
        for asset in loaded {
            match asset {
                LoadedAsset::Backdrop(result) | LoadedAsset::Environment(result) => {
                    assert!(result.is_ok())
                }
                LoadedAsset::Font(result) => assert!(result.is_ok()),
            }
        }
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn test_missing_files_report_errors() {
        let loader = AssetLoader::spawn(AssetSources {
            backdrop: Some(PathBuf::from("/nonexistent/wood.jpg")),
            environment: Some(PathBuf::from("/nonexistent/env.png")),
            font: Some(PathBuf::from("/nonexistent/font.toml")),
        });
        for asset in collect(&loader) {
            match asset {
                LoadedAsset::Backdrop(result) | LoadedAsset::Environment(result) => {
                    assert!(matches!(result, Err(AssetError::Image { .. })))
                }
                LoadedAsset::Font(result) => {
                    assert!(matches!(result, Err(AssetError::Font(FontError::Io { .. }))))
                }
            }
        }
    }
}
