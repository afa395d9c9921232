pub mod inspect;
pub mod locate;
pub mod lookup;
pub mod normalize;
