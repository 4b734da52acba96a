use num_traits::{One, PrimInt};

/// Trait implemented by flag enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) typically determines the bit index.
/// You choose the backing integer type via the associated `Storage`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // Equivalent to: 1 << index
        // NOTE: Ensure your `bit_index()` is < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container over any primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    pub fn all() -> Self {
        Self { bits: !T::zero() }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits & !flag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    pub fn with<U: FlagBitmask<Storage = T>>(mut self, flag: U) -> Self {
        self.add(flag);
        self
    }

    pub fn without<U: FlagBitmask<Storage = T>>(mut self, flag: U) -> Self {
        self.remove(flag);
        self
    }

    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(flags: &[U]) -> Self {
        let mut out = Self::empty();
        for &flag in flags {
            out.add(flag);
        }
        out
    }

    /// True if any bit is shared with `other`.
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }
}

/// Collision layers a collider can belong to.
///
/// The numeric values are bit indices. Do not reorder without updating level data.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CollisionLayer {
    Default = 0,
    Terrain = 1,
    Climbable = 2,
    Character = 3,
    Trigger = 4,
}

impl FlagBitmask for CollisionLayer {
    type Storage = u32;

    fn bit_index(&self) -> u8 {
        *self as u8
    }
}

/// Set of collision layers a query is allowed to see.
pub type LayerMask = BitmaskFlags<u32>;

/// Layers the character's own casts hit: everything except characters and triggers.
pub fn environment_mask() -> LayerMask {
    LayerMask::all()
        .without(CollisionLayer::Character)
        .without(CollisionLayer::Trigger)
}
