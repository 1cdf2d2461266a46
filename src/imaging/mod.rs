mod media;
mod normalize;

pub use self::{
    media::{IMAGE_DIR, MediaStore},
    normalize::{MAX_DIMENSION, NormalizedImage, Orientation, normalize},
};
