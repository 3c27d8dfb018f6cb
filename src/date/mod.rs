//! ECMAScript-compatible date/time arithmetic.
//!
//! Layered bottom-up, mirroring the dependency order in which a caller
//! actually needs them: [`calendar`] (pure instant ⇄ calendar-field
//! arithmetic) underlies [`local`] (UTC ⇄ local-time adjustment against a
//! host timezone), which underlies [`parse`] and [`format`] (string ⇄
//! instant), which underlie [`value`] (the `Date` object's constructor
//! dispatch, value coercion, and getter/setter contract).

pub mod calendar;
pub mod format;
pub mod local;
mod mathutil;
pub mod parse;
pub mod value;
