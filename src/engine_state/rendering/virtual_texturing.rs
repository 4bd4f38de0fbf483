//! # Virtual Texturing
//!
//! Maps texture resource names onto a bounded set of atlas slots.
//!
//! ## Model
//! - `VirtualTexturing` owns the slot table and is cheap to clone (shared handle)
//! - Each mesh build takes a `VirtualTexturingContext`, translates the names it needs
//!   and finally calls `update_contents()` once to flush its new residents
//! - The context then travels with the mesh into the chunk's render state. Slots it
//!   translated stay referenced until the context is dropped, which happens when the
//!   chunk's mesh is replaced
//! - Slot 0 is permanently reserved for the fallback texture
//!
//! Translation fails once every slot is referenced by a live context.

use std::collections::HashMap;

use crate::core::MtResource;

/// Resource path of the texture held in the fallback slot.
pub const FALLBACK_TEXTURE: &str = "textures/notex.png";

/// Outcome of a translation request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TranslationResult {
    /// The texture is mapped to this slot.
    Success(u32),
    /// The atlas has no free slot left.
    Failure,
}

#[derive(Debug)]
struct Slot {
    name: String,
    references: usize,
    uploaded: bool,
}

#[derive(Debug)]
struct AtlasState {
    slots: Vec<Option<Slot>>,
    by_name: HashMap<String, u32>,
}

impl AtlasState {
    fn acquire(&mut self, name: &str) -> Option<u32> {
        if let Some(&id) = self.by_name.get(name) {
            if let Some(slot) = self.slots[id as usize].as_mut() {
                slot.references += 1;
            }
            return Some(id);
        }

        let id = self.free_slot()?;
        if let Some(evicted) = self.slots[id as usize].take() {
            log::trace!("Evicting '{}' from atlas slot {}", evicted.name, id);
            self.by_name.remove(&evicted.name);
        }
        self.slots[id as usize] = Some(Slot {
            name: name.to_string(),
            references: 1,
            uploaded: false,
        });
        self.by_name.insert(name.to_string(), id);
        Some(id)
    }

    /// Never-used slots first, then slots no live context references.
    fn free_slot(&self) -> Option<u32> {
        let unused = self.slots.iter().position(Option::is_none);
        let unreferenced = || {
            self.slots
                .iter()
                .enumerate()
                .skip(1)
                .find(|(_, slot)| matches!(slot, Some(s) if s.references == 0))
                .map(|(i, _)| i)
        };
        unused.or_else(unreferenced).map(|i| i as u32)
    }

    fn release(&mut self, id: u32) {
        if let Some(slot) = self.slots.get_mut(id as usize).and_then(Option::as_mut) {
            slot.references = slot.references.saturating_sub(1);
        }
    }
}

/// Shared handle to the virtual texture atlas.
#[derive(Clone)]
pub struct VirtualTexturing {
    state: MtResource<AtlasState>,
}

impl VirtualTexturing {
    /// Slot that always holds [`FALLBACK_TEXTURE`].
    pub const FALLBACK_SLOT: u32 = 0;

    /// Creates an atlas with `capacity` slots, the fallback slot included.
    pub fn new(capacity: usize) -> Self {
        let mut slots: Vec<Option<Slot>> = (0..capacity.max(1)).map(|_| None).collect();
        slots[Self::FALLBACK_SLOT as usize] = Some(Slot {
            name: FALLBACK_TEXTURE.to_string(),
            // pinned: never reaches zero
            references: 1,
            uploaded: true,
        });
        let mut by_name = HashMap::new();
        by_name.insert(FALLBACK_TEXTURE.to_string(), Self::FALLBACK_SLOT);

        VirtualTexturing {
            state: MtResource::new(AtlasState { slots, by_name }),
        }
    }

    /// Starts a translation context for one mesh build.
    pub fn get_context(&self) -> VirtualTexturingContext {
        VirtualTexturingContext {
            atlas: self.clone(),
            translated: HashMap::new(),
            pending_upload: Vec::new(),
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.state.get().slots.len()
    }

    /// Slot currently holding `name`, if any.
    pub fn slot_of(&self, name: &str) -> Option<u32> {
        self.state.get().by_name.get(name).copied()
    }

    /// Number of live context references on a slot. The fallback slot carries one
    /// permanent reference.
    pub fn references(&self, id: u32) -> usize {
        self.state
            .get()
            .slots
            .get(id as usize)
            .and_then(Option::as_ref)
            .map(|slot| slot.references)
            .unwrap_or(0)
    }

    /// Whether the texture in a slot has been flushed by `update_contents()`.
    pub fn is_uploaded(&self, id: u32) -> bool {
        self.state
            .get()
            .slots
            .get(id as usize)
            .and_then(Option::as_ref)
            .map(|slot| slot.uploaded)
            .unwrap_or(false)
    }
}

/// Translation context of one mesh build.
pub struct VirtualTexturingContext {
    atlas: VirtualTexturing,
    translated: HashMap<String, u32>,
    pending_upload: Vec<u32>,
}

impl VirtualTexturingContext {
    /// Maps a texture resource name to an atlas slot.
    ///
    /// Repeated requests for the same name within one context reuse the first result
    /// without touching the shared atlas.
    pub fn translate(&mut self, texture: &str) -> TranslationResult {
        if let Some(&id) = self.translated.get(texture) {
            return TranslationResult::Success(id);
        }

        let acquired = self.atlas.state.get_mut().acquire(texture);
        match acquired {
            Some(id) => {
                self.translated.insert(texture.to_string(), id);
                self.pending_upload.push(id);
                TranslationResult::Success(id)
            }
            None => TranslationResult::Failure,
        }
    }

    /// Flushes the slots this context made resident.
    pub fn update_contents(&mut self) {
        if self.pending_upload.is_empty() {
            return;
        }
        let mut state = self.atlas.state.get_mut();
        let mut uploaded = 0;
        for id in self.pending_upload.drain(..) {
            if let Some(slot) = state.slots[id as usize].as_mut() {
                if !slot.uploaded {
                    slot.uploaded = true;
                    uploaded += 1;
                }
            }
        }
        log::debug!("Virtual texturing flushed {} new atlas slots", uploaded);
    }

    /// Number of distinct textures this context translated.
    pub fn translated_count(&self) -> usize {
        self.translated.len()
    }
}

impl Drop for VirtualTexturingContext {
    fn drop(&mut self) {
        let mut state = self.atlas.state.get_mut();
        for id in self.translated.values() {
            state.release(*id);
        }
    }
}
