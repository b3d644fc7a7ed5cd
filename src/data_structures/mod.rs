pub use rectangle::Rectangle;

mod rectangle;
