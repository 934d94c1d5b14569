//! Scene ownership.
//!
//! [`SceneRoot`] is a generational arena holding every visual object the
//! client has instantiated. Hosts read it to render; only the rebuild writes
//! to it. A handle from before a rebuild never resolves to a newer object.

use rescue_events::GridCoord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of visual object placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Wall,
    Door,
    Fire,
}

impl ObjectKind {
    /// All kinds, in rebuild order.
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Wall, ObjectKind::Door, ObjectKind::Fire];
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Wall => write!(f, "wall"),
            ObjectKind::Door => write!(f, "door"),
            ObjectKind::Fire => write!(f, "fire"),
        }
    }
}

/// A 3D render position. The board lies in the XZ plane with `y` up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Places a grid coordinate on the ground plane, `scale` units per cell.
    pub fn on_ground(coord: GridCoord, scale: f32) -> Self {
        Self {
            x: coord.x as f32 * scale,
            y: 0.0,
            z: coord.y as f32 * scale,
        }
    }
}

/// One instantiated object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub kind: ObjectKind,
    /// Template the host should render this object with.
    pub prefab: String,
    /// Grid cell the object was derived from.
    pub cell: GridCoord,
    pub position: WorldPosition,
    /// Door status string for doors, `None` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Stable reference to an object in a [`SceneRoot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    object: Option<SceneObject>,
}

/// Owning container for every object currently in the scene.
#[derive(Debug, Clone, Default)]
pub struct SceneRoot {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    /// Bumped every time the contents are replaced wholesale.
    revision: u64,
}

impl SceneRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of completed [`replace_all`](Self::replace_all) calls.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Takes ownership of an object and returns its handle.
    pub fn spawn(&mut self, object: SceneObject) -> ObjectHandle {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            return ObjectHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            object: Some(object),
        });
        ObjectHandle {
            index,
            generation: 0,
        }
    }

    /// Looks up a live object.
    pub fn get(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.object.as_ref())
    }

    /// Releases every object. Returns how many were released.
    ///
    /// Freed slots are handed out again lowest index first, so the next
    /// spawns iterate in the order they were made.
    pub fn clear(&mut self) -> usize {
        let released = self.len;
        for slot in self.slots.iter_mut() {
            if slot.object.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.len = 0;
        released
    }

    /// Releases every object, then takes ownership of `objects`.
    ///
    /// Returns the number of objects released.
    pub fn replace_all(&mut self, objects: impl IntoIterator<Item = SceneObject>) -> usize {
        let released = self.clear();
        for object in objects {
            self.spawn(object);
        }
        self.revision += 1;
        released
    }

    /// Iterates over live objects with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &SceneObject)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.object.as_ref().map(|object| {
                (
                    ObjectHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    object,
                )
            })
        })
    }

    /// Iterates over live objects of one kind.
    pub fn objects_of(&self, kind: ObjectKind) -> impl Iterator<Item = &SceneObject> {
        self.iter()
            .map(|(_, object)| object)
            .filter(move |object| object.kind == kind)
    }

    /// Counts live objects of one kind.
    pub fn count_of(&self, kind: ObjectKind) -> usize {
        self.objects_of(kind).count()
    }
}
