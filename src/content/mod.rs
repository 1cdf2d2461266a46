mod blocks;
mod preview;
mod slug;

pub use self::{
    blocks::{Block, compose, split_paragraphs},
    preview::{first_image_src, strip_tags_except_img},
    slug::slugify,
};
