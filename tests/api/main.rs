// fn main not required; all api tests are bundled into one executable
mod health_check;
mod landing;
mod waitlist;
