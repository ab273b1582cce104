use bitflags::bitflags;

bitflags! {
    /// Classification tags consulted by the ability selector and the combo
    /// subsystem.
    ///
    /// In RON content tags are a `|`-separated list inside the newtype
    /// parentheses, e.g. `tags: ("DAMAGE | FINISHER")`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AbilityTags: u8 {
        const BUILDER   = 1 << 0;
        const FINISHER  = 1 << 1;
        const HEAL      = 1 << 2;
        const DAMAGE    = 1 << 3;
        const TAUNT     = 1 << 4;
        const INTERRUPT = 1 << 5;
    }
}

impl AbilityTags {
    /// Tags whose abilities are scored by the offense term.
    pub const OFFENSIVE: Self = Self::DAMAGE.union(Self::INTERRUPT);
}
