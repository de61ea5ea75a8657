pub mod time;

mod line_buffer;
pub use line_buffer::LineBuffer;
