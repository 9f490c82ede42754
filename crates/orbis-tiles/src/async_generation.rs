//! Background tile generation on a fixed thread pool.
//!
//! Requests go out over a bounded channel, finished tiles come back over
//! another, and each request carries a cancellation flag so stale tiles can
//! be dropped before delivery. Workers never touch the floating origin; they
//! only produce real-world [`Tile`]s.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use orbis_cubesphere::TileCode;
use tracing::debug;

use crate::{SurfaceProvider, Tile, TileGenerationError, TileSettings, generate_tile};

/// Provider shared by all workers.
pub type SharedProvider = Arc<dyn SurfaceProvider + Send + Sync>;

/// A request to sample one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileRequest {
    pub code: TileCode,
    pub settings: TileSettings,
}

/// A finished (or failed) tile handed back to the tick thread.
#[derive(Debug)]
pub struct GeneratedTile {
    pub code: TileCode,
    pub result: Result<Tile, TileGenerationError>,
    /// Wall time spent in [`generate_tile`], in microseconds.
    pub generation_time_us: u64,
    /// Flag of the request that produced this tile.
    cancelled: Arc<AtomicBool>,
}

struct QueuedRequest {
    request: TileRequest,
    cancelled: Arc<AtomicBool>,
}

/// Runs [`generate_tile`] across a pool of worker threads.
///
/// Dropping the generator closes the request channel; workers finish the
/// request in hand and exit.
pub struct TileGenerator {
    request_sender: Sender<QueuedRequest>,
    result_receiver: Receiver<GeneratedTile>,
    active: Arc<DashMap<TileCode, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
    thread_count: usize,
}

impl TileGenerator {
    /// Spawn `thread_count` workers (at least one) sampling from `provider`.
    ///
    /// `max_concurrent` bounds queued requests; `result_capacity` bounds
    /// finished tiles waiting for [`drain_results`](Self::drain_results).
    pub fn new(
        provider: SharedProvider,
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
    ) -> io::Result<Self> {
        let thread_count = thread_count.max(1);
        let (request_sender, request_receiver) = bounded::<QueuedRequest>(max_concurrent.max(1));
        let (result_sender, result_receiver) = bounded::<GeneratedTile>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for index in 0..thread_count {
            let receiver = request_receiver.clone();
            let sender = result_sender.clone();
            let provider = Arc::clone(&provider);
            let in_flight = Arc::clone(&in_flight);

            std::thread::Builder::new()
                .name(format!("tile-gen-{index}"))
                .spawn(move || {
                    while let Ok(QueuedRequest { request, cancelled }) = receiver.recv() {
                        if !cancelled.load(Ordering::Relaxed) {
                            let start = Instant::now();
                            let result =
                                generate_tile(&request.code, &request.settings, provider.as_ref());
                            let generation_time_us = start.elapsed().as_micros() as u64;

                            if !cancelled.load(Ordering::Relaxed) {
                                let _ = sender.send(GeneratedTile {
                                    code: request.code,
                                    result,
                                    generation_time_us,
                                    cancelled,
                                });
                            }
                        }
                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
        }

        debug!(thread_count, max_concurrent, "Tile generator started");

        Ok(Self {
            request_sender,
            result_receiver,
            active: Arc::new(DashMap::new()),
            in_flight,
            thread_count,
        })
    }

    /// A generator sized to the machine, leaving two cores for the tick and
    /// render threads.
    pub fn with_defaults(provider: SharedProvider) -> io::Result<Self> {
        Self::new(provider, default_thread_count(), 64, 128)
    }

    /// Queue a request. Returns it back if the queue is full.
    ///
    /// A request for a code that is already pending supersedes the older one
    /// once it is queued. A bounced request leaves the older one untouched.
    #[allow(clippy::result_large_err)]
    pub fn submit(&self, request: TileRequest) -> Result<(), TileRequest> {
        let code = request.code.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let previous = self.active.insert(code.clone(), Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        let queued = QueuedRequest {
            request,
            cancelled: Arc::clone(&cancelled),
        };
        match self.request_sender.try_send(queued) {
            Ok(()) => {
                if let Some(previous) = previous {
                    previous.store(true, Ordering::Relaxed);
                }
                Ok(())
            }
            Err(e) => {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                self.restore(&code, &cancelled, previous);
                Err(e.into_inner().request)
            }
        }
    }

    /// Undo the map update of a bounced submission, unless something else
    /// replaced it in the meantime.
    fn restore(
        &self,
        code: &TileCode,
        ours: &Arc<AtomicBool>,
        previous: Option<Arc<AtomicBool>>,
    ) {
        match previous {
            Some(previous) => {
                if let Some(mut entry) = self.active.get_mut(code)
                    && Arc::ptr_eq(entry.value(), ours)
                {
                    *entry = previous;
                }
            }
            None => {
                self.active.remove_if(code, |_, flag| Arc::ptr_eq(flag, ours));
            }
        }
    }

    /// Cancel a queued or running request. Its result, if any, is dropped.
    pub fn cancel(&self, code: &TileCode) {
        if let Some((_, cancelled)) = self.active.remove(code) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Collect every finished tile. Call once per tick.
    ///
    /// Results of cancelled or superseded requests are discarded, even if
    /// they were sent before the cancellation landed.
    pub fn drain_results(&self) -> Vec<GeneratedTile> {
        let mut results = Vec::new();
        while let Ok(tile) = self.result_receiver.try_recv() {
            if tile.cancelled.load(Ordering::Relaxed) {
                continue;
            }
            self.active
                .remove_if(&tile.code, |_, flag| Arc::ptr_eq(flag, &tile.cancelled));
            results.push(tile);
        }
        results
    }

    /// Requests queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if a request for `code` has not been delivered yet.
    pub fn is_pending(&self, code: &TileCode) -> bool {
        self.active.contains_key(code)
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }
}

/// `num_cpus - 2`, at least one.
pub fn default_thread_count() -> usize {
    num_cpus::get().saturating_sub(2).max(1)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use orbis_cubesphere::CubeFace;
    use orbis_math::GeodeticPoint;

    use super::*;
    use crate::{Color, ConstantSurface, NoiseParams, NoiseSurface, ProviderError, SurfaceSample};

    fn request(code: &str) -> TileRequest {
        TileRequest {
            code: code.parse().unwrap(),
            settings: TileSettings {
                resolution_u: 5,
                resolution_v: 5,
                ..Default::default()
            },
        }
    }

    fn wait_idle(generator: &TileGenerator) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while generator.in_flight_count() > 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(generator.in_flight_count(), 0);
    }

    fn codes(results: &[GeneratedTile]) -> Vec<String> {
        let mut codes: Vec<String> = results.iter().map(|r| r.code.to_string()).collect();
        codes.sort();
        codes
    }

    fn wait_for(generator: &TileGenerator, expected: usize) -> Vec<GeneratedTile> {
        let mut results = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(30);
        while results.len() < expected && Instant::now() < deadline {
            results.extend(generator.drain_results());
            if results.len() < expected {
                std::thread::sleep(Duration::from_millis(5));
            }
        }
        results
    }

    #[test]
    fn test_concurrent_generation_delivers_everything() {
        let provider: SharedProvider = Arc::new(NoiseSurface::new(NoiseParams::default()));
        let generator = TileGenerator::new(provider, 4, 64, 64).unwrap();

        let codes: Vec<TileCode> = CubeFace::ALL
            .into_iter()
            .flat_map(|face| TileCode::root(face).children().unwrap())
            .collect();
        for code in &codes {
            let req = TileRequest {
                code: code.clone(),
                settings: request("Frt").settings,
            };
            assert!(generator.submit(req).is_ok());
        }

        let results = wait_for(&generator, codes.len());
        assert_eq!(results.len(), codes.len());
        for tile in &results {
            let generated = tile.result.as_ref().unwrap();
            assert_eq!(generated.code(), &tile.code);
            assert!(!generator.is_pending(&tile.code));
        }
    }

    #[test]
    fn test_results_match_synchronous_generation() {
        let provider = ConstantSurface::new(10.0, Color::WHITE);
        let generator = TileGenerator::new(Arc::new(provider), 1, 8, 8).unwrap();
        let req = request("Bak123");
        generator.submit(req.clone()).unwrap();

        let results = wait_for(&generator, 1);
        let expected = generate_tile(&req.code, &req.settings, &provider).unwrap();
        assert_eq!(results[0].result.as_ref().unwrap(), &expected);
    }

    #[test]
    fn test_provider_failure_is_delivered() {
        let provider = |_: &GeodeticPoint| -> Result<SurfaceSample, ProviderError> {
            Err("offline".into())
        };
        let generator = TileGenerator::new(Arc::new(provider), 1, 8, 8).unwrap();
        generator.submit(request("Top")).unwrap();

        let results = wait_for(&generator, 1);
        assert!(matches!(
            results[0].result,
            Err(TileGenerationError::Lookup { .. })
        ));
    }

    #[test]
    fn test_full_queue_returns_request() {
        // Nothing drains the single result slot, so the worker blocks and
        // the one-slot request queue fills.
        let provider: SharedProvider = Arc::new(ConstantSurface::default());
        let generator = TileGenerator::new(provider, 1, 1, 1).unwrap();

        let mut rejected = None;
        for i in 0..64 {
            let code = TileCode::containing(CubeFace::Front, (i as f64 + 0.5) / 64.0, 0.5, 6);
            let req = TileRequest {
                code,
                settings: request("Frt").settings,
            };
            if let Err(req) = generator.submit(req) {
                rejected = Some(req);
                break;
            }
        }
        let rejected = rejected.expect("queue never filled");
        assert!(!generator.is_pending(&rejected.code));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let generator =
            TileGenerator::new(Arc::new(ConstantSurface::default()), 1, 8, 8).unwrap();
        let req = request("Lft0");
        generator.submit(req.clone()).unwrap();
        assert!(generator.is_pending(&req.code));

        generator.cancel(&req.code);
        assert!(!generator.is_pending(&req.code));

        // The worker may have finished before the cancel landed; either way
        // the pool drains.
        let deadline = Instant::now() + Duration::from_secs(10);
        while generator.in_flight_count() > 0 && Instant::now() < deadline {
            let _ = generator.drain_results();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(generator.in_flight_count(), 0);
    }

    #[test]
    fn test_bounced_resubmit_keeps_running_request() {
        let (started_tx, started_rx) = bounded::<()>(1);
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let provider = move |_: &GeodeticPoint| -> Result<SurfaceSample, ProviderError> {
            let _ = started_tx.try_send(());
            // Blocks until the gate sender is dropped.
            let _ = gate_rx.recv();
            Ok(SurfaceSample {
                elevation: 0.0,
                color: Color::WHITE,
            })
        };
        let generator = TileGenerator::new(Arc::new(provider), 1, 1, 8).unwrap();
        let first = request("Frt0");
        let second = request("Frt1");

        generator.submit(first.clone()).unwrap();
        started_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        generator.submit(second.clone()).unwrap();

        // The queue is full, so the resubmission bounces and the running
        // request must stay in force.
        let bounced = generator.submit(first.clone());
        assert_eq!(bounced, Err(first.clone()));
        assert!(generator.is_pending(&first.code));
        assert!(generator.is_pending(&second.code));

        drop(gate_tx);
        let results = wait_for(&generator, 2);
        assert_eq!(codes(&results), ["Frt0", "Frt1"]);
        assert!(!generator.is_pending(&first.code));
    }

    #[test]
    fn test_stale_result_is_dropped_after_resubmit() {
        let generator =
            TileGenerator::new(Arc::new(ConstantSurface::default()), 1, 8, 8).unwrap();
        let req = request("Rgt2");
        generator.submit(req.clone()).unwrap();
        wait_idle(&generator);

        // The first result sits undrained when the code is resubmitted.
        generator.submit(req.clone()).unwrap();
        let mut delivered = generator.drain_results();
        if delivered.is_empty() {
            assert!(generator.is_pending(&req.code));
        }

        wait_idle(&generator);
        delivered.extend(generator.drain_results());
        assert_eq!(delivered.len(), 1);
        assert!(!generator.is_pending(&req.code));
    }

    #[test]
    fn test_resubmit_of_queued_request_delivers_once() {
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let provider = move |p: &GeodeticPoint| -> Result<SurfaceSample, ProviderError> {
            // Only tiles on the top face wait for the gate.
            if p.latitude > 0.9 {
                let _ = gate_rx.recv();
            }
            Ok(SurfaceSample {
                elevation: 0.0,
                color: Color::WHITE,
            })
        };
        let generator = TileGenerator::new(Arc::new(provider), 1, 4, 8).unwrap();
        let blocker = request("Top");
        let req = request("Bak3");

        generator.submit(blocker).unwrap();
        generator.submit(req.clone()).unwrap();
        generator.submit(req.clone()).unwrap();
        assert!(generator.is_pending(&req.code));

        drop(gate_tx);
        wait_idle(&generator);
        let results = generator.drain_results();
        assert_eq!(codes(&results), ["Bak3", "Top"]);
        assert!(!generator.is_pending(&req.code));
    }

    #[test]
    fn test_default_thread_count_is_positive() {
        assert!(default_thread_count() >= 1);
        let generator = TileGenerator::new(Arc::new(ConstantSurface::default()), 0, 1, 1).unwrap();
        assert_eq!(generator.thread_count(), 1);
    }
}
