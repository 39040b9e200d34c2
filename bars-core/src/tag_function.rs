//! Tag functions: what happens when a popup element or the badge is activated.
//!
//! The host hands every popup element a single `i32` function id and passes
//! it back verbatim when the element is activated. The id packs an 8-bit
//! function kind (bits 0..8) and a 20-bit payload (bits 8..28):
//!
//! ```text
//!  31    28 27                       8 7         0
//! ┌────────┬───────────────────────────┬───────────┐
//! │ unused │          payload          │   kind    │
//! └────────┴───────────────────────────┴───────────┘
//! ```
//!
//! Inside the crate functions are always [`TagFunction`] values. Packing and
//! unpacking happens only where ids cross the host boundary, via
//! [`TagFunction::encode`] and [`TagFunction::decode`].

use serde::{Deserialize, Serialize};

use crate::error::TagFunctionError;

/// Number of payload bits in a packed function id
pub const PAYLOAD_BITS: u32 = 20;

/// Largest payload a packed function id can carry
pub const PAYLOAD_MAX: u32 = (1 << PAYLOAD_BITS) - 1;

const KIND_BITS: u32 = 8;
const KIND_MASK: u32 = (1 << KIND_BITS) - 1;

/// Function kind stored in the low byte of a packed id
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagFunctionKind {
    None = 0,
    OpenMenu = 1,
    OpenEditAerodrome = 2,
    SubmitEditAerodrome = 3,
    ToggleControlling = 4,
    OpenSelectProfile = 5,
    SubmitSelectProfile = 6,
    OpenSelectPreset = 7,
    SubmitSelectPreset = 8,
    OpenSelectView = 9,
    SubmitSelectView = 10,
}

impl TagFunctionKind {
    /// Every kind, in id order
    pub const ALL: [TagFunctionKind; 11] = [
        TagFunctionKind::None,
        TagFunctionKind::OpenMenu,
        TagFunctionKind::OpenEditAerodrome,
        TagFunctionKind::SubmitEditAerodrome,
        TagFunctionKind::ToggleControlling,
        TagFunctionKind::OpenSelectProfile,
        TagFunctionKind::SubmitSelectProfile,
        TagFunctionKind::OpenSelectPreset,
        TagFunctionKind::SubmitSelectPreset,
        TagFunctionKind::OpenSelectView,
        TagFunctionKind::SubmitSelectView,
    ];

    /// Try to convert a u8 to a TagFunctionKind
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// A kind and payload pair exactly as the host sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawTagFunction {
    pub kind: TagFunctionKind,
    pub payload: u32,
}

impl RawTagFunction {
    pub fn new(kind: TagFunctionKind, payload: u32) -> Result<Self, TagFunctionError> {
        if payload > PAYLOAD_MAX {
            return Err(TagFunctionError::PayloadOverflow(payload));
        }
        Ok(RawTagFunction { kind, payload })
    }

    /// Pack into a host function id
    pub fn pack(self) -> i32 {
        (self.kind as u32 | (self.payload << KIND_BITS)) as i32
    }

    /// Unpack a host function id. Bits above the payload are ignored.
    pub fn unpack(id: i32) -> Result<Self, TagFunctionError> {
        let id = id as u32;
        let kind = (id & KIND_MASK) as u8;
        let kind = TagFunctionKind::from_u8(kind).ok_or(TagFunctionError::UnknownKind(kind))?;
        Ok(RawTagFunction {
            kind,
            payload: (id >> KIND_BITS) & PAYLOAD_MAX,
        })
    }
}

/// Step of a submenu chain.
///
/// A submenu cannot be opened from inside the popup callback that selected
/// it, so selection first produces a `Request`, which the controller defers
/// and replays as `Open` on the next decoration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmenuStep {
    /// Selected from the parent menu (payload 0)
    Request,
    /// Replayed from the deferred slot (payload 1)
    Open,
}

impl SubmenuStep {
    fn payload(self) -> u32 {
        match self {
            SubmenuStep::Request => 0,
            SubmenuStep::Open => 1,
        }
    }

    fn from_payload(payload: u32) -> Self {
        if payload == 0 {
            SubmenuStep::Request
        } else {
            SubmenuStep::Open
        }
    }
}

/// A function the overlay controller can be asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagFunction {
    /// Inert element (disabled entries, separators)
    None,
    OpenMenu,
    OpenEditAerodrome,
    SubmitEditAerodrome,
    ToggleControlling,
    OpenSelectProfile(SubmenuStep),
    SubmitSelectProfile(usize),
    OpenSelectPreset(SubmenuStep),
    SubmitSelectPreset(usize),
    OpenSelectView(SubmenuStep),
    SubmitSelectView(usize),
}

impl TagFunction {
    pub fn kind(&self) -> TagFunctionKind {
        match self {
            TagFunction::None => TagFunctionKind::None,
            TagFunction::OpenMenu => TagFunctionKind::OpenMenu,
            TagFunction::OpenEditAerodrome => TagFunctionKind::OpenEditAerodrome,
            TagFunction::SubmitEditAerodrome => TagFunctionKind::SubmitEditAerodrome,
            TagFunction::ToggleControlling => TagFunctionKind::ToggleControlling,
            TagFunction::OpenSelectProfile(_) => TagFunctionKind::OpenSelectProfile,
            TagFunction::SubmitSelectProfile(_) => TagFunctionKind::SubmitSelectProfile,
            TagFunction::OpenSelectPreset(_) => TagFunctionKind::OpenSelectPreset,
            TagFunction::SubmitSelectPreset(_) => TagFunctionKind::SubmitSelectPreset,
            TagFunction::OpenSelectView(_) => TagFunctionKind::OpenSelectView,
            TagFunction::SubmitSelectView(_) => TagFunctionKind::SubmitSelectView,
        }
    }

    /// The deferred form of a submenu request, if this is one
    pub fn deferred(&self) -> Option<TagFunction> {
        match self {
            TagFunction::OpenSelectProfile(SubmenuStep::Request) => {
                Some(TagFunction::OpenSelectProfile(SubmenuStep::Open))
            }
            TagFunction::OpenSelectPreset(SubmenuStep::Request) => {
                Some(TagFunction::OpenSelectPreset(SubmenuStep::Open))
            }
            TagFunction::OpenSelectView(SubmenuStep::Request) => {
                Some(TagFunction::OpenSelectView(SubmenuStep::Open))
            }
            _ => None,
        }
    }

    pub fn to_raw(&self) -> Result<RawTagFunction, TagFunctionError> {
        let payload = match *self {
            TagFunction::OpenSelectProfile(step)
            | TagFunction::OpenSelectPreset(step)
            | TagFunction::OpenSelectView(step) => step.payload(),
            TagFunction::SubmitSelectProfile(index)
            | TagFunction::SubmitSelectPreset(index)
            | TagFunction::SubmitSelectView(index) => {
                u32::try_from(index).map_err(|_| TagFunctionError::PayloadOverflow(u32::MAX))?
            }
            _ => 0,
        };
        RawTagFunction::new(self.kind(), payload)
    }

    pub fn from_raw(raw: RawTagFunction) -> Self {
        let index = raw.payload as usize;
        match raw.kind {
            TagFunctionKind::None => TagFunction::None,
            TagFunctionKind::OpenMenu => TagFunction::OpenMenu,
            TagFunctionKind::OpenEditAerodrome => TagFunction::OpenEditAerodrome,
            TagFunctionKind::SubmitEditAerodrome => TagFunction::SubmitEditAerodrome,
            TagFunctionKind::ToggleControlling => TagFunction::ToggleControlling,
            TagFunctionKind::OpenSelectProfile => {
                TagFunction::OpenSelectProfile(SubmenuStep::from_payload(raw.payload))
            }
            TagFunctionKind::SubmitSelectProfile => TagFunction::SubmitSelectProfile(index),
            TagFunctionKind::OpenSelectPreset => {
                TagFunction::OpenSelectPreset(SubmenuStep::from_payload(raw.payload))
            }
            TagFunctionKind::SubmitSelectPreset => TagFunction::SubmitSelectPreset(index),
            TagFunctionKind::OpenSelectView => {
                TagFunction::OpenSelectView(SubmenuStep::from_payload(raw.payload))
            }
            TagFunctionKind::SubmitSelectView => TagFunction::SubmitSelectView(index),
        }
    }

    /// Pack into a host function id
    pub fn encode(&self) -> Result<i32, TagFunctionError> {
        self.to_raw().map(RawTagFunction::pack)
    }

    /// Unpack a host function id
    pub fn decode(id: i32) -> Result<Self, TagFunctionError> {
        RawTagFunction::unpack(id).map(TagFunction::from_raw)
    }
}
