pub mod map_renderer;
pub mod scout_map;
