//! Edge watching
//!
//! One task per edge line. It sleeps until the digital port arms the line,
//! then waits for the armed edge on its own pin handle and raises the
//! line's edge signal. A new arm request replaces the current edge,
//! `None` parks the task again.

use board_support::registry::{Edge, EDGE_PINS};
use defmt::{debug, trace};
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Flex;

use crate::system::gpio::{EDGES, EDGE_ARM};

/// Watch edge line `line` on `pin`
#[embassy_executor::task(pool_size = 4)]
pub async fn edge_watch(line: usize, mut pin: Flex<'static>) {
    let mut armed: Option<Edge> = None;

    loop {
        let request = match armed {
            None => EDGE_ARM[line].wait().await,
            Some(edge) => match select(EDGE_ARM[line].wait(), wait_for(&mut pin, edge)).await {
                Either::First(request) => request,
                Either::Second(()) => {
                    trace!("edge on D{}", EDGE_PINS[line]);
                    EDGES.raise(line);
                    continue;
                }
            },
        };
        debug!("D{} watching {}", EDGE_PINS[line], request);
        armed = request;
    }
}

async fn wait_for(pin: &mut Flex<'static>, edge: Edge) {
    match edge {
        Edge::Rising => pin.wait_for_rising_edge().await,
        Edge::Falling => pin.wait_for_falling_edge().await,
        Edge::Both => pin.wait_for_any_edge().await,
    }
}
