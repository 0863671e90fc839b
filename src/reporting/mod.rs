pub mod html;
pub mod json;
pub mod model;
pub mod reporter;
pub mod text;
pub mod writer;
