// THEORY:
// A `SurveyPool` answers many nearest-rain queries against one radar frame, for
// example every weather station on a map, by spreading them over a pool of
// tokio worker tasks.
//
// Each query is independent and the image and palette are only ever read, so
// workers share them through `Arc` with no locking. The scan itself is CPU-bound
// and runs on tokio's blocking pool; worker tasks only shuttle queries and answers. A dispatcher task hands
// queries to workers round-robin; each query carries a oneshot channel for its
// answer, so results come back in the order they were asked for regardless of
// which worker finished first.

use crate::core_modules::locator::{nearest_rain_with, LocatorConfig, RainReport};
use crate::core_modules::palette::RainPalette;
use crate::core_modules::position::Position;
use crate::core_modules::radar_image::PixelSource;
use crate::error::{RadarError, Result};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// One query waiting for a worker.
pub struct SurveyTask {
    pub position: Position,
    pub result_sender: oneshot::Sender<Result<RainReport>>,
}

/// A pool of workers running nearest-rain queries against a shared image.
pub struct SurveyPool {
    task_sender: mpsc::UnboundedSender<SurveyTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl SurveyPool {
    /// Starts one worker per CPU. Must be called from inside a tokio runtime.
    pub fn new<S>(image: Arc<S>, palette: Arc<RainPalette>, config: LocatorConfig) -> Self
    where
        S: PixelSource + Send + Sync + 'static,
    {
        Self::with_workers(image, palette, config, num_cpus::get())
    }

    pub fn with_workers<S>(
        image: Arc<S>,
        palette: Arc<RainPalette>,
        config: LocatorConfig,
        worker_count: usize,
    ) -> Self
    where
        S: PixelSource + Send + Sync + 'static,
    {
        let worker_count = worker_count.max(1);
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<SurveyTask>();

        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<SurveyTask>())
            .unzip();

        // Dispatcher
        tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                if worker_senders[worker_idx].send(task).is_err() {
                    tracing::warn!(worker_idx, "survey worker stopped; dropping query");
                }
                worker_idx = (worker_idx + 1) % worker_senders.len();
            }
        });

        let mut workers = Vec::with_capacity(worker_count);
        for (worker_idx, mut worker_receiver) in worker_receivers.into_iter().enumerate() {
            let image = Arc::clone(&image);
            let palette = Arc::clone(&palette);

            let worker = tokio::spawn(async move {
                let mut answered = 0usize;
                while let Some(task) = worker_receiver.recv().await {
                    let image = Arc::clone(&image);
                    let palette = Arc::clone(&palette);
                    let position = task.position;
                    let scan = tokio::task::spawn_blocking(move || {
                        nearest_rain_with(position, image.as_ref(), &palette, &config)
                    });
                    match scan.await {
                        Ok(report) => {
                            let _ = task.result_sender.send(report);
                            answered += 1;
                        }
                        // Dropping the sender reports the query as `PoolClosed`.
                        Err(err) => tracing::warn!(worker_idx, %position, error = %err, "survey scan failed"),
                    }
                }
                tracing::debug!(worker_idx, answered, "survey worker finished");
            });
            workers.push(worker);
        }

        tracing::debug!(worker_count, palette = palette.name(), "survey pool started");
        Self { task_sender, workers }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Runs a single query on the pool.
    pub async fn locate(&self, position: Position) -> Result<RainReport> {
        let (result_sender, result_receiver) = oneshot::channel();
        self.task_sender
            .send(SurveyTask {
                position,
                result_sender,
            })
            .map_err(|_| RadarError::PoolClosed)?;
        result_receiver.await.map_err(|_| RadarError::PoolClosed)?
    }

    /// Runs many queries concurrently. Results are in the same order as `positions`.
    pub async fn survey<I>(&self, positions: I) -> Vec<Result<RainReport>>
    where
        I: IntoIterator<Item = Position>,
    {
        join_all(positions.into_iter().map(|position| self.locate(position))).await
    }

    /// Stops accepting queries and waits for every worker to drain.
    pub async fn shutdown(self) {
        drop(self.task_sender);
        for worker in self.workers {
            if let Err(err) = worker.await {
                tracing::warn!(error = %err, "survey worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color::color::Rgb;
    use crate::core_modules::locator::nearest_rain;
    use crate::core_modules::radar_image::RadarImage;

    fn storm() -> (Arc<RadarImage>, Arc<RainPalette>) {
        let mut image = RadarImage::filled(32, 32, Rgb::WHITE);
        for position in [(3, 4), (28, 2), (5, 30), (25, 27), (16, 16)] {
            image.paint(Position::new(position.0, position.1), Rgb::new(239, 0, 0));
        }
        (Arc::new(image), Arc::new(RainPalette::met_eireann()))
    }

    #[tokio::test]
    async fn survey_matches_sequential_queries_in_order() {
        let (image, palette) = storm();
        let pool = SurveyPool::with_workers(Arc::clone(&image), Arc::clone(&palette), LocatorConfig::default(), 3);
        assert_eq!(pool.worker_count(), 3);

        let positions: Vec<Position> = (0..32).step_by(5).map(|i| Position::new(i, 31 - i)).collect();
        let reports = pool.survey(positions.clone()).await;

        assert_eq!(reports.len(), positions.len());
        for (position, report) in positions.iter().zip(reports) {
            let expected = nearest_rain(*position, image.as_ref(), &palette).unwrap();
            assert_eq!(report.unwrap(), expected);
        }
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn errors_come_back_per_query() {
        let (image, palette) = storm();
        let pool = SurveyPool::new(image, palette, LocatorConfig::default());

        let reports = pool.survey([Position::new(16, 16), Position::new(-1, 0)]).await;
        assert!(reports[0].as_ref().unwrap().raining_at_center());
        assert!(reports[1].as_ref().unwrap_err().is_out_of_bounds());
        pool.shutdown().await;
    }

    /// Holds up every center lookup, standing in for a scan of a huge frame.
    struct SlowSource {
        inner: RadarImage,
        delay: std::time::Duration,
    }

    impl PixelSource for SlowSource {
        fn width(&self) -> u32 {
            self.inner.width()
        }

        fn height(&self) -> u32 {
            self.inner.height()
        }

        fn color_at(&self, position: Position) -> Result<Rgb> {
            if position == Position::new(1, 1) {
                std::thread::sleep(self.delay);
            }
            self.inner.color_at(position)
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn long_scans_leave_the_runtime_free() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let source = SlowSource {
            inner: RadarImage::filled(3, 3, Rgb::WHITE),
            delay: std::time::Duration::from_millis(300),
        };
        let pool = SurveyPool::with_workers(
            Arc::new(source),
            Arc::new(RainPalette::met_eireann()),
            LocatorConfig::default(),
            1,
        );

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                    ticks.fetch_add(1, Ordering::Relaxed);
                }
            })
        };

        let report = pool.locate(Position::new(1, 1)).await.unwrap();
        assert_eq!(report.distances(), [None; 4]);
        // The single runtime thread kept running other tasks during the scan.
        assert!(ticks.load(Ordering::Relaxed) >= 5, "ticker stalled during the scan");

        ticker.abort();
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn zero_workers_still_gets_one() {
        let (image, palette) = storm();
        let pool = SurveyPool::with_workers(image, palette, LocatorConfig::default(), 0);
        assert_eq!(pool.worker_count(), 1);
        assert!(pool.locate(Position::new(10, 10)).await.is_ok());
        pool.shutdown().await;
    }
}
