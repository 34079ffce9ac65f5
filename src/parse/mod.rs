// SPDX-License-Identifier: MIT

//! Binary/text payload parsers for the passive multicast listeners.

pub mod dns;
pub mod ssdp;
