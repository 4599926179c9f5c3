// Wed Jan 14 2026 - Alex

pub mod constants;
pub mod file;
pub mod file_data;

pub use constants::{
    parse_file_mode, parse_map_mode, parse_map_prot, parse_open_mode, FileMode, MapMode, MapProt, OpenMode,
    PlatformConstants,
};
pub use file::File;
pub use file_data::FileData;
