pub mod blur_image_use_case;
pub mod blur_region_use_case;
pub mod fill_region_use_case;
