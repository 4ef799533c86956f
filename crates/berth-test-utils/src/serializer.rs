//! Title-keyed view serializer.

use berth_core::alloc::HashMap;
use berth_docking::{DockError, DockResult, View, ViewSerializer, ViewSource, WindowId};
use bytes::{BufMut, Bytes, BytesMut};
use parking_lot::Mutex;

/// Records a serializer call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializerCall {
    Write { title: String },
    Read { title: String, existing: bool },
}

/// Encodes a view as its UTF-8 title.
///
/// Titles registered with [`NameSerializer::register`] read back as the
/// registered view; any other title creates a new view with default content.
#[derive(Debug, Default)]
pub struct NameSerializer {
    known: HashMap<String, WindowId>,
    calls: Mutex<Vec<SerializerCall>>,
}

impl NameSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `title` to `view` when reading.
    pub fn register(mut self, title: impl Into<String>, view: WindowId) -> Self {
        self.known.insert(title.into(), view);
        self
    }

    pub fn calls(&self) -> Vec<SerializerCall> {
        self.calls.lock().clone()
    }

    pub fn count_writes(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, SerializerCall::Write { .. }))
            .count()
    }

    pub fn count_reads(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, SerializerCall::Read { .. }))
            .count()
    }
}

impl<C: Default> ViewSerializer<C> for NameSerializer {
    fn write_view(&self, view: &View<C>, out: &mut BytesMut) -> DockResult<()> {
        out.put_slice(view.title.as_bytes());
        self.calls.lock().push(SerializerCall::Write {
            title: view.title.clone(),
        });
        Ok(())
    }

    fn read_view(&mut self, input: &mut Bytes) -> DockResult<ViewSource<C>> {
        let title =
            String::from_utf8(input.to_vec()).map_err(|err| DockError::View(err.to_string()))?;
        let existing = self.known.get(&title).copied();
        self.calls.lock().push(SerializerCall::Read {
            title: title.clone(),
            existing: existing.is_some(),
        });

        Ok(match existing {
            Some(view) => ViewSource::Existing(view),
            None => ViewSource::New {
                title,
                icon: None,
                content: C::default(),
            },
        })
    }
}
