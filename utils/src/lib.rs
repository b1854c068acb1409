#![cfg_attr(not(feature = "std"), no_std)]

//! Support code shared by the POD GPC crates: serde adapters for arkworks
//! objects and small numeric helpers used when sizing Merkle trees and
//! mapping signed 64-bit integers into the field.

pub mod ff;
pub mod misc;
pub mod serde_utils;
