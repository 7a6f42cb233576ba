//=========================================================================
// Object Pool
//=========================================================================
//
// Per-kind caches of pre-allocated, reusable objects.
//
// Architecture:
//   register(kind, amount, factory) → HashMap<K, KindPool<T>>
//                                         │  slots: Vec<Slot<T>>
//   acquire(kind) ── first inactive ──────┤  (grow by one if none)
//   release(handle) ── mark inactive ─────┘
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;
use thiserror::Error;

//=== Public API ==========================================================

/// Marker trait for pool kinds.
pub trait PoolKind: Clone + Copy + Eq + Hash + Debug + 'static {}

/// Errors produced by [`ObjectPool`].
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// No pool was registered for the kind.
    #[error("no pool registered for {kind}")]
    UnknownKind { kind: String },

    /// Handle does not refer to an active object.
    #[error("handle {index} of {kind} does not refer to an active object")]
    StaleHandle { kind: String, index: usize },
}

/// Reference to an acquired object.
///
/// A handle stays valid until its object is released. Once the slot is
/// handed out again the old handle is stale, even though the index matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle<K: PoolKind> {
    kind: K,
    index: usize,
    generation: u32,
}

impl<K: PoolKind> PoolHandle<K> {
    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

//=========================================================================

struct Slot<T> {
    object: T,
    active: bool,
    // Bumped on every acquire.
    generation: u32,
}

impl<T> Slot<T> {
    fn new(object: T) -> Self {
        Self {
            object,
            active: false,
            generation: 0,
        }
    }

    fn held_by<K: PoolKind>(&self, handle: &PoolHandle<K>) -> bool {
        self.active && self.generation == handle.generation
    }
}

struct KindPool<T> {
    slots: Vec<Slot<T>>,
    factory: Box<dyn Fn() -> T + Send>,
}

impl<T> KindPool<T> {
    fn slot<K: PoolKind>(&self, handle: &PoolHandle<K>) -> Option<&Slot<T>> {
        self.slots.get(handle.index).filter(|slot| slot.held_by(handle))
    }

    fn slot_mut<K: PoolKind>(&mut self, handle: &PoolHandle<K>) -> Option<&mut Slot<T>> {
        self.slots.get_mut(handle.index).filter(|slot| slot.held_by(handle))
    }
}

/// Pool of reusable objects grouped by kind.
///
/// Objects are never dropped while the pool lives; released objects are
/// handed out again by later [`acquire`](Self::acquire) calls, with their
/// state as it was left. Reset what needs resetting after acquiring.
pub struct ObjectPool<K: PoolKind, T> {
    pools: HashMap<K, KindPool<T>>,
}

impl<K: PoolKind, T> ObjectPool<K, T> {
    /// Creates a pool with no kinds registered.
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `kind`, pre-allocating `amount` inactive objects.
    ///
    /// Re-registering a kind replaces its pool and factory.
    pub fn register<F>(&mut self, kind: K, amount: usize, factory: F)
    where
        F: Fn() -> T + Send + 'static,
    {
        let slots = (0..amount).map(|_| Slot::new(factory())).collect();

        debug!("Pool {:?} pre-allocated {} object(s)", kind, amount);
        self.pools.insert(
            kind,
            KindPool {
                slots,
                factory: Box::new(factory),
            },
        );
    }

    //--- Acquire / Release ------------------------------------------------

    /// Activates and returns the first inactive object of `kind`.
    ///
    /// Grows the pool by one object if every object is active.
    pub fn acquire(&mut self, kind: K) -> Result<PoolHandle<K>, PoolError> {
        let pool = self.pools.get_mut(&kind).ok_or_else(|| unknown(kind))?;

        let index = match pool.slots.iter().position(|slot| !slot.active) {
            Some(index) => index,
            None => {
                let object = (pool.factory)();
                pool.slots.push(Slot::new(object));
                debug!("Pool {:?} grew to: {}", kind, pool.slots.len());
                pool.slots.len() - 1
            }
        };

        let slot = &mut pool.slots[index];
        slot.active = true;
        slot.generation = slot.generation.wrapping_add(1);
        Ok(PoolHandle {
            kind,
            index,
            generation: slot.generation,
        })
    }

    /// Returns the object to its pool.
    pub fn release(&mut self, handle: PoolHandle<K>) -> Result<(), PoolError> {
        let pool = self.pools.get_mut(&handle.kind).ok_or_else(|| unknown(handle.kind))?;
        let slot = pool.slot_mut(&handle).ok_or_else(|| stale(handle))?;
        slot.active = false;
        Ok(())
    }

    //--- Access -----------------------------------------------------------

    /// Active object behind `handle`.
    pub fn get(&self, handle: PoolHandle<K>) -> Result<&T, PoolError> {
        let pool = self.pools.get(&handle.kind).ok_or_else(|| unknown(handle.kind))?;
        pool.slot(&handle)
            .map(|slot| &slot.object)
            .ok_or_else(|| stale(handle))
    }

    /// Mutable access to the active object behind `handle`.
    pub fn get_mut(&mut self, handle: PoolHandle<K>) -> Result<&mut T, PoolError> {
        let pool = self.pools.get_mut(&handle.kind).ok_or_else(|| unknown(handle.kind))?;
        pool.slot_mut(&handle)
            .map(|slot| &mut slot.object)
            .ok_or_else(|| stale(handle))
    }

    //--- Query API --------------------------------------------------------

    /// Total objects allocated for `kind`, active or not.
    pub fn len(&self, kind: K) -> usize {
        self.pools.get(&kind).map(|pool| pool.slots.len()).unwrap_or(0)
    }

    /// Objects of `kind` currently handed out.
    pub fn active_count(&self, kind: K) -> usize {
        self.pools
            .get(&kind)
            .map(|pool| pool.slots.iter().filter(|slot| slot.active).count())
            .unwrap_or(0)
    }

    /// Deactivates every object of every kind.
    pub fn release_all(&mut self) {
        for pool in self.pools.values_mut() {
            for slot in &mut pool.slots {
                slot.active = false;
            }
        }
    }
}

impl<K: PoolKind, T> Default for ObjectPool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown<K: PoolKind>(kind: K) -> PoolError {
    PoolError::UnknownKind {
        kind: format!("{:?}", kind),
    }
}

fn stale<K: PoolKind>(handle: PoolHandle<K>) -> PoolError {
    PoolError::StaleHandle {
        kind: format!("{:?}", handle.kind),
        index: handle.index,
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Pooled {
        Bullet,
        Spark,
    }

    impl PoolKind for Pooled {}

    #[derive(Debug, Default, PartialEq)]
    struct Bullet {
        x: f32,
    }

    fn bullets(amount: usize) -> ObjectPool<Pooled, Bullet> {
        let mut pool = ObjectPool::new();
        pool.register(Pooled::Bullet, amount, Bullet::default);
        pool
    }

    #[test]
    fn register_preallocates() {
        let pool = bullets(5);
        assert_eq!(pool.len(Pooled::Bullet), 5);
        assert_eq!(pool.active_count(Pooled::Bullet), 0);
    }

    #[test]
    fn acquire_reuses_released_objects() {
        let mut pool = bullets(2);

        let first = pool.acquire(Pooled::Bullet).unwrap();
        pool.get_mut(first).unwrap().x = 3.0;
        pool.release(first).unwrap();

        let again = pool.acquire(Pooled::Bullet).unwrap();
        assert_eq!(again.index(), first.index());
        assert_eq!(pool.get(again).unwrap().x, 3.0);
        assert_eq!(pool.len(Pooled::Bullet), 2);
    }

    #[test]
    fn exhaustion_grows_by_one() {
        let mut pool = bullets(1);

        let a = pool.acquire(Pooled::Bullet).unwrap();
        let b = pool.acquire(Pooled::Bullet).unwrap();

        assert_ne!(a.index(), b.index());
        assert_eq!(pool.len(Pooled::Bullet), 2);
        assert_eq!(pool.active_count(Pooled::Bullet), 2);
    }

    #[test]
    fn zero_amount_pool_grows_on_demand() {
        let mut pool = bullets(0);
        let handle = pool.acquire(Pooled::Bullet).unwrap();
        assert_eq!(handle.kind(), Pooled::Bullet);
        assert_eq!(pool.len(Pooled::Bullet), 1);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let mut pool = bullets(1);
        assert_eq!(
            pool.acquire(Pooled::Spark).unwrap_err(),
            PoolError::UnknownKind { kind: "Spark".into() }
        );
        assert_eq!(pool.len(Pooled::Spark), 0);
    }

    #[test]
    fn released_handles_go_stale() {
        let mut pool = bullets(1);
        let handle = pool.acquire(Pooled::Bullet).unwrap();
        pool.release(handle).unwrap();

        assert!(matches!(pool.get(handle), Err(PoolError::StaleHandle { .. })));
        assert!(matches!(pool.release(handle), Err(PoolError::StaleHandle { .. })));
    }

    #[test]
    fn old_handle_cannot_reach_reacquired_object() {
        let mut pool = bullets(1);
        let old = pool.acquire(Pooled::Bullet).unwrap();
        pool.release(old).unwrap();

        let new = pool.acquire(Pooled::Bullet).unwrap();
        assert_eq!(new.index(), old.index());
        pool.get_mut(new).unwrap().x = 7.0;

        assert!(matches!(pool.get(old), Err(PoolError::StaleHandle { .. })));
        assert!(matches!(pool.get_mut(old), Err(PoolError::StaleHandle { .. })));
        assert!(matches!(pool.release(old), Err(PoolError::StaleHandle { .. })));

        assert_eq!(pool.active_count(Pooled::Bullet), 1);
        assert_eq!(pool.get(new).unwrap().x, 7.0);
        assert_ne!(old, new);
    }

    #[test]
    fn release_all_frees_everything() {
        let mut pool = bullets(3);
        for _ in 0..3 {
            pool.acquire(Pooled::Bullet).unwrap();
        }
        pool.release_all();
        assert_eq!(pool.active_count(Pooled::Bullet), 0);
        assert_eq!(pool.len(Pooled::Bullet), 3);
    }
}
