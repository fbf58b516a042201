mod cache;
mod resources;
