//! JSON wire codec for the domain designer.
//!
//! The service speaks camelCase JSON with a few quirks (lowercase `url` and
//! `phi`, a single flat validator list, int ranges for user references,
//! clamped text scale). [`create_domain`] and [`serialize_domain`] are the
//! only crossings between that format and [`designer_model::Domain`].

pub mod codec;
pub mod convert;
pub mod error;
pub mod types;

pub use codec::{
    create_domain, create_domain_from_str, create_exception, serialize_domain, serialize_field,
};
pub use convert::clamp_scale;
pub use error::{Result, WireError};
pub use types::{
    RawConditionalFormat, RawDomain, RawExceptionPayload, RawField, RawIndex, RawPayloadError,
    RawValidator,
};
