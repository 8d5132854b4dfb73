// Static files served to the editor: contact icons and the sample resume.

pub mod handlers;
pub mod icons;
pub mod resume_data;
