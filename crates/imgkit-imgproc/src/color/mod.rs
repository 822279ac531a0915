mod gray;
pub use gray::*;

mod rgb;
pub use rgb::*;
