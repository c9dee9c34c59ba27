//! Named registry of debug images.
//!
//! Pipeline stages publish intermediate images under a title; the capture
//! loop renders every visible slot after each processed frame. Slots are
//! never removed, so a slot's index stays valid for the registry's lifetime.
//! Lookups are linear scans: a session publishes tens of images, not thousands.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::display::{Display, WindowMode};
use crate::image::{Depth, ImageBuffer, ImageError, ImageSize};

/// Shared handle to an image buffer.
pub type SharedImage = Rc<RefCell<ImageBuffer>>;

/// Whether the registry keeps a published image alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The registry holds a strong reference and releases it on replacement or drop
    Owned,
    /// The registry holds a weak reference; the publisher controls the lifetime
    Borrowed,
}

/// Errors that can occur when publishing to the registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("image title must not be empty")]
    EmptyTitle,

    #[error("failed to allocate image '{title}': {source}")]
    Allocation {
        title: String,
        #[source]
        source: ImageError,
    },
}

#[derive(Debug)]
enum SlotImage {
    Owned(SharedImage),
    Borrowed(Weak<RefCell<ImageBuffer>>),
}

impl SlotImage {
    fn new(image: &SharedImage, ownership: Ownership) -> Self {
        match ownership {
            Ownership::Owned => SlotImage::Owned(Rc::clone(image)),
            Ownership::Borrowed => SlotImage::Borrowed(Rc::downgrade(image)),
        }
    }

    fn upgrade(&self) -> Option<SharedImage> {
        match self {
            SlotImage::Owned(image) => Some(Rc::clone(image)),
            SlotImage::Borrowed(weak) => weak.upgrade(),
        }
    }

    fn ownership(&self) -> Ownership {
        match self {
            SlotImage::Owned(_) => Ownership::Owned,
            SlotImage::Borrowed(_) => Ownership::Borrowed,
        }
    }
}

/// One named entry in the registry.
#[derive(Debug)]
pub struct ImageSlot {
    title: String,
    image: SlotImage,
    visible: bool,
}

impl ImageSlot {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn ownership(&self) -> Ownership {
        self.image.ownership()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The slot's image, or `None` if a borrowed image has been dropped.
    pub fn image(&self) -> Option<SharedImage> {
        self.image.upgrade()
    }
}

/// Registry of named images with per-slot visibility.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    slots: Vec<ImageSlot>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Publish `image` under `title` and return the slot index.
    ///
    /// A new title appends a hidden slot. A known title keeps its index and
    /// visibility; the previous image is released if the registry owned it.
    ///
    /// # Errors
    /// * `RegistryError::EmptyTitle` - if `title` is empty
    pub fn publish(
        &mut self,
        title: &str,
        image: &SharedImage,
        ownership: Ownership,
    ) -> Result<usize, RegistryError> {
        if title.is_empty() {
            return Err(RegistryError::EmptyTitle);
        }

        let image = SlotImage::new(image, ownership);
        match self.lookup(title) {
            Some(index) => {
                // Dropping the old SlotImage releases an owned buffer exactly once
                self.slots[index].image = image;
                log::debug!("Replaced image '{}' at slot {}", title, index);
                Ok(index)
            }
            None => {
                self.slots.push(ImageSlot {
                    title: title.to_string(),
                    image,
                    visible: false,
                });
                let index = self.slots.len() - 1;
                log::debug!("Published image '{}' at slot {}", title, index);
                Ok(index)
            }
        }
    }

    /// Allocate a zero-filled image and publish it as owned.
    ///
    /// Nothing is published if allocation fails.
    pub fn allocate(
        &mut self,
        title: &str,
        size: ImageSize,
        depth: Depth,
        channels: u8,
    ) -> Result<SharedImage, RegistryError> {
        if title.is_empty() {
            return Err(RegistryError::EmptyTitle);
        }
        let image = ImageBuffer::new(size, depth, channels).map_err(|source| {
            RegistryError::Allocation {
                title: title.to_string(),
                source,
            }
        })?;
        self.publish_allocated(title, image)
    }

    /// Allocate an image shaped like `proto` and publish it as owned.
    ///
    /// Size and origin come from the prototype; `depth` and `channels`
    /// override the prototype's when given.
    pub fn allocate_like(
        &mut self,
        title: &str,
        proto: &ImageBuffer,
        depth: Option<Depth>,
        channels: Option<u8>,
    ) -> Result<SharedImage, RegistryError> {
        if title.is_empty() {
            return Err(RegistryError::EmptyTitle);
        }
        let image = ImageBuffer::like(proto, depth, channels).map_err(|source| {
            RegistryError::Allocation {
                title: title.to_string(),
                source,
            }
        })?;
        self.publish_allocated(title, image)
    }

    fn publish_allocated(
        &mut self,
        title: &str,
        image: ImageBuffer,
    ) -> Result<SharedImage, RegistryError> {
        let image = Rc::new(RefCell::new(image));
        self.publish(title, &image, Ownership::Owned)?;
        Ok(image)
    }

    /// Index of the slot with exactly this title.
    pub fn lookup(&self, title: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.title == title)
    }

    pub fn slot(&self, index: usize) -> Option<&ImageSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> impl Iterator<Item = &ImageSlot> {
        self.slots.iter()
    }

    /// Image at `index`, or `None` if out of range or a dropped borrowed image.
    pub fn get(&self, index: usize) -> Option<SharedImage> {
        self.slots.get(index).and_then(ImageSlot::image)
    }

    /// Image published under `title`.
    pub fn get_by_title(&self, title: &str) -> Option<SharedImage> {
        self.lookup(title).and_then(|index| self.get(index))
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.visible)
    }

    /// Flip the visibility of the slot at `index` and return the new state.
    ///
    /// Showing a slot creates a window named after its title; hiding it
    /// destroys that window. Out-of-range indices return `false` and do nothing.
    pub fn toggle_visible(
        &mut self,
        index: usize,
        mode: WindowMode,
        display: &mut dyn Display,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            log::debug!("No image at slot {} to toggle", index);
            return false;
        };

        slot.visible = !slot.visible;
        let result = if slot.visible {
            display.create_window(&slot.title, mode)
        } else {
            display.destroy_window(&slot.title)
        };
        if let Err(e) = result {
            log::warn!("Window for '{}' not updated: {}", slot.title, e);
        }

        log::info!(
            "Image '{}' {}",
            slot.title,
            if slot.visible { "shown" } else { "hidden" }
        );
        slot.visible
    }

    /// Push every visible slot's image to its window.
    ///
    /// Slots whose borrowed image was dropped, or whose image is currently
    /// mutably borrowed, are skipped this time.
    pub fn render_visible(&self, display: &mut dyn Display) {
        for slot in self.slots.iter().filter(|slot| slot.visible) {
            let Some(image) = slot.image() else {
                log::trace!("Image '{}' no longer exists", slot.title);
                continue;
            };
            let Ok(image) = image.try_borrow() else {
                log::trace!("Image '{}' is being written, skipping", slot.title);
                continue;
            };
            if let Err(e) = display.show(&slot.title, &image) {
                log::debug!("Failed to show '{}': {}", slot.title, e);
            }
        }
    }
}
