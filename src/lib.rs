//! Read musical scales from [Scala](http://www.huygens-fokker.org/scala/) files and write them as tuning tables for
//! Scala, Timidity, Csound and Fluidsynth.
//!
//! The entry point is [`table::TuningTable`] which pairs a [`scala::Scl`] with the [`pitch::ReferencePitch`] it is
//! anchored to.

pub mod format;
pub mod key;
pub mod pitch;
pub mod scala;
pub mod table;
pub mod value;
