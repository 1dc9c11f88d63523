pub mod product;
pub mod region;

pub use product::Product;
pub use region::Region;
