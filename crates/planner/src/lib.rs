//! Slidecast Planner
//!
//! Decides what a slideshow will contain before anything is rendered:
//! - **Image Catalog:** Discover candidate images in a directory
//! - **Duration Planner:** Turn a target duration into a capped slide count
//! - **Slide Selector:** Pick (and repeat) images to fill that count
//!
//! Apart from the directory scan this crate is pure computation.
//! Randomness and progress reporting are injected by the caller.

pub mod catalog;
pub mod duration;
pub mod observer;
pub mod selector;

pub use catalog::{discover_images, ImagePath};
pub use duration::{DurationPlanner, DurationRange, PlanTarget, PlanningMode, SlidePlan};
pub use observer::{PlanObserver, TracingObserver};
pub use selector::{select_slides, SelectionPolicy, SlideSequence};
