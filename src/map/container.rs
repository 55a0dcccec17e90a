use crate::map::{MapError, SurfaceId};
use std::sync::{Arc, Mutex, PoisonError};

/// The element a map surface renders into. Clones share the same binding slot.
#[derive(Clone, Debug)]
pub struct MapContainer {
    id: String,
    binding: Arc<Mutex<Option<SurfaceId>>>,
}

impl MapContainer {
    pub fn new(id: impl Into<String>) -> Self {
        MapContainer {
            id: id.into(),
            binding: Arc::new(Mutex::new(None)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bound_surface(&self) -> Option<SurfaceId> {
        *self.binding.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Binds a surface to this container, failing if another surface already owns it.
    pub fn bind(&self, surface: SurfaceId) -> Result<(), MapError> {
        let mut binding = self.binding.lock().unwrap_or_else(PoisonError::into_inner);
        match *binding {
            Some(bound) if bound != surface => Err(MapError::ContainerInUse(self.id.clone())),
            _ => {
                *binding = Some(surface);
                Ok(())
            }
        }
    }

    /// Clears the binding if it still belongs to `surface`.
    pub fn release(&self, surface: SurfaceId) {
        let mut binding = self.binding.lock().unwrap_or_else(PoisonError::into_inner);
        if *binding == Some(surface) {
            *binding = None;
        }
    }

    pub fn clear(&self) {
        *self.binding.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
