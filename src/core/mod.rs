// ─── Mod descriptor core ───
// Reads identity metadata out of mods as the launcher finds them on disk.
//
// Architecture:
//   core/
//     error.rs  — ModError / ModResult
//     config.rs — descriptor names and read limits
//     mods/     — ModType detection, entry sources, descriptor parsers, Mod

pub mod config;
pub mod error;
pub mod mods;
