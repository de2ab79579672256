//! Rotating slide sets
//!
//! `Carousel` is plain state: slides, the current index and an explicit
//! pause flag. `CarouselTicker` owns the timer task that advances a shared
//! carousel; dropping the ticker stops the rotation.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::render::{Element, Node};

/// One slide
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub key: String,
    pub node: Node,
}

impl Slide {
    pub fn new(key: impl Into<String>, node: impl Into<Node>) -> Self {
        Self {
            key: key.into(),
            node: node.into(),
        }
    }

    /// Slide holding a single image
    pub fn image(src: &str, alt: &str) -> Self {
        Self::new(
            src,
            Element::new("img")
                .attr("src", src)
                .attr("alt", alt)
                .style("width", "100%")
                .style("height", "auto")
                .style("display", "block"),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Carousel {
    slides: Vec<Slide>,
    index: usize,
    /// Set while the pointer is over the carousel
    paused: bool,
}

impl Carousel {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            index: 0,
            paused: false,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.index)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Swap in a new slide set. Nothing changes when the keys match;
    /// otherwise the position follows the current slide's key or restarts.
    /// Returns true when the slides were replaced.
    pub fn set_slides(&mut self, slides: Vec<Slide>) -> bool {
        if self.slides.iter().map(|s| &s.key).eq(slides.iter().map(|s| &s.key)) {
            return false;
        }
        let current = self.current().map(|s| s.key.clone());
        self.index = current
            .and_then(|key| slides.iter().position(|s| s.key == key))
            .unwrap_or(0);
        self.slides = slides;
        true
    }

    /// Advance one slide. Returns false when paused or when there is
    /// nothing to rotate.
    pub fn tick(&mut self) -> bool {
        if self.paused || self.slides.len() <= 1 {
            return false;
        }
        self.index = (self.index + 1) % self.slides.len();
        true
    }

    /// Jump to a slide; out-of-range indices are ignored
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        self.index = index;
        true
    }

    /// Slide track plus indicator buttons. Nothing for an empty carousel.
    pub fn render(&self) -> Option<Node> {
        if self.slides.is_empty() {
            return None;
        }
        let count = self.slides.len();

        let track = Element::new("div")
            .attr("class", "carousel-track")
            .style("display", "flex")
            .style("transition", "transform 480ms ease")
            .style("transform", format!("translateX(-{}%)", self.index * 100))
            .style("width", format!("{}%", count * 100))
            .children(self.slides.iter().map(|s| {
                Node::from(
                    Element::new("div")
                        .attr("data-key", s.key.as_str())
                        .style("width", format!("{}%", 100.0 / count as f64))
                        .style("flex", "0 0 auto")
                        .child(s.node.clone()),
                )
            }));

        let indicators = Element::new("div")
            .attr("class", "carousel-indicators")
            .style("position", "absolute")
            .style("left", "12px")
            .style("bottom", "12px")
            .style("display", "flex")
            .style("gap", "8px")
            .children((0..count).map(|i| {
                let background = if i == self.index {
                    "rgba(255,255,255,0.95)"
                } else {
                    "rgba(255,255,255,0.45)"
                };
                Node::from(
                    Element::new("button")
                        .attr("type", "button")
                        .attr("data-slide", i.to_string())
                        .attr("aria-label", format!("Go to slide {}", i + 1))
                        .style("width", "8px")
                        .style("height", "8px")
                        .style("border-radius", "8px")
                        .style("border", "none")
                        .style("padding", "0")
                        .style("background", background),
                )
            }));

        Some(
            Element::new("div")
                .attr("class", "carousel")
                .attr("aria-roledescription", "carousel")
                .style("width", "100%")
                .style("overflow", "hidden")
                .style("position", "relative")
                .child(track)
                .child(indicators)
                .into(),
        )
    }
}

/// Auto-advance task for a shared carousel, cancelled on drop
pub struct CarouselTicker {
    handle: JoinHandle<()>,
}

impl CarouselTicker {
    /// Start ticking `carousel` every `period`. The first advance happens one
    /// full period after the call.
    pub fn spawn(carousel: Arc<Mutex<Carousel>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                let mut carousel = carousel.lock().await;
                if carousel.tick() {
                    tracing::trace!("Carousel advanced to {}", carousel.index());
                }
            }
        });
        Self { handle }
    }

    /// Stop rotating; same as dropping the ticker
    pub fn stop(self) {}
}

impl Drop for CarouselTicker {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Carousel ticker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slides(n: usize) -> Vec<Slide> {
        (0..n)
            .map(|i| Slide::image(&format!("/img/{}.png", i), ""))
            .collect()
    }

    #[test]
    fn test_tick_wraps() {
        let mut carousel = Carousel::new(slides(3));
        assert!(carousel.tick());
        assert!(carousel.tick());
        assert_eq!(carousel.index(), 2);
        assert!(carousel.tick());
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_single_slide_and_pause() {
        let mut single = Carousel::new(slides(1));
        assert!(!single.tick());
        assert_eq!(single.index(), 0);

        let mut carousel = Carousel::new(slides(2));
        carousel.set_paused(true);
        assert!(!carousel.tick());
        assert_eq!(carousel.index(), 0);
        carousel.set_paused(false);
        assert!(carousel.tick());
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_go_to() {
        let mut carousel = Carousel::new(slides(3));
        assert!(carousel.go_to(2));
        assert_eq!(carousel.index(), 2);
        assert!(!carousel.go_to(3));
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_set_slides_follows_current_key() {
        let mut carousel = Carousel::new(slides(3));
        carousel.set_paused(true);
        carousel.go_to(1);
        assert!(!carousel.set_slides(slides(3)));
        assert_eq!(carousel.index(), 1);

        let mut reordered = slides(3);
        reordered.reverse();
        assert!(carousel.set_slides(reordered));
        assert_eq!(carousel.index(), 1);
        assert_eq!(carousel.current().unwrap().key, "/img/1.png");
        assert!(carousel.is_paused());

        carousel.go_to(2);
        assert!(carousel.set_slides(slides(1)));
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_render() {
        assert!(Carousel::default().render().is_none());

        let mut carousel = Carousel::new(slides(3));
        carousel.go_to(1);
        let html = carousel.render().unwrap().to_html();
        assert!(html.contains("translateX(-100%)"));
        assert!(html.contains("width:300%"));
        assert!(html.contains(r#"aria-label="Go to slide 3""#));
        assert_eq!(html.matches("<button").count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_advances_on_interval() {
        let shared = Arc::new(Mutex::new(Carousel::new(slides(3))));
        let ticker = CarouselTicker::spawn(shared.clone(), Duration::from_millis(3000));

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(shared.lock().await.index(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(shared.lock().await.index(), 1);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(shared.lock().await.index(), 2);

        drop(ticker);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_respects_pause_and_drop() {
        let shared = Arc::new(Mutex::new(Carousel::new(slides(2))));
        let ticker = CarouselTicker::spawn(shared.clone(), Duration::from_millis(1000));

        shared.lock().await.set_paused(true);
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(shared.lock().await.index(), 0);

        shared.lock().await.set_paused(false);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(shared.lock().await.index(), 1);

        ticker.stop();
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(shared.lock().await.index(), 1);
    }
}
