//! Bus channel identifiers
//!
//! A board has up to three software buses. Each channel is bound to its
//! line driver once at startup through a [`ChannelTable`]; protocol code
//! then works against that one instance.

/// Number of software bus channels
pub const CHANNEL_COUNT: usize = 3;

/// Software bus channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    Ch0 = 0,
    Ch1 = 1,
    Ch2 = 2,
}

impl Channel {
    /// All channels in index order
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::Ch0, Channel::Ch1, Channel::Ch2];

    /// Get the channel as an index
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Create a channel from an index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// One optional bus instance per channel
///
/// Unwired channels stay `None`.
pub struct ChannelTable<T> {
    slots: [Option<T>; CHANNEL_COUNT],
}

impl<T> Default for ChannelTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChannelTable<T> {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            slots: [None, None, None],
        }
    }

    /// Bind a bus to a channel, returning the previous one if any
    pub fn insert(&mut self, channel: Channel, bus: T) -> Option<T> {
        self.slots[channel.index()].replace(bus)
    }

    /// Remove the bus bound to a channel
    pub fn take(&mut self, channel: Channel) -> Option<T> {
        self.slots[channel.index()].take()
    }

    pub fn get(&self, channel: Channel) -> Option<&T> {
        self.slots[channel.index()].as_ref()
    }

    pub fn get_mut(&mut self, channel: Channel) -> Option<&mut T> {
        self.slots[channel.index()].as_mut()
    }

    /// Iterate over wired channels
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Channel, &mut T)> {
        Channel::ALL
            .into_iter()
            .zip(self.slots.iter_mut())
            .filter_map(|(ch, slot)| slot.as_mut().map(|bus| (ch, bus)))
    }
}
