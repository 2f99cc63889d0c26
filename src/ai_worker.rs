use crate::ai::{generate_question, OpenRouterClient};
use crate::logger;
use crate::models::{GenRequest, GenResponse};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

/// Spawn the question-generation worker. The UI loop stays responsive while
/// the single in-flight request blocks here; the session guard ensures at
/// most one request at a time.
pub fn spawn_generation_worker(
    gen_tx: Sender<GenResponse>,
    gen_rx: Receiver<GenRequest>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("docquiz::generation_worker".to_string())
        .spawn(move || loop {
            match gen_rx.recv() {
                Ok(GenRequest::Generate {
                    request_id,
                    document_text,
                }) => {
                    logger::log(&format!("Worker received request {}", request_id));
                    let client = match OpenRouterClient::new() {
                        Ok(client) => client,
                        Err(e) => {
                            let _ = gen_tx.send(GenResponse::Error {
                                request_id,
                                error: format!("Failed to create AI client: {}", e),
                            });
                            continue;
                        }
                    };

                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            let _ = gen_tx.send(GenResponse::Error {
                                request_id,
                                error: format!("Failed to start async runtime: {}", e),
                            });
                            continue;
                        }
                    };

                    let result = rt.block_on(generate_question(&client, &document_text));

                    match result {
                        Ok(raw) => {
                            logger::log("Worker sending generated question");
                            let _ = gen_tx.send(GenResponse::Generated { request_id, raw });
                        }
                        Err(e) => {
                            logger::log(&format!("Worker error: {}", e));
                            let _ = gen_tx.send(GenResponse::Error {
                                request_id,
                                error: format!("Question generation failed: {}", e),
                            });
                        }
                    }
                }
                Err(_) => {
                    // Channel disconnected, exit worker
                    logger::log("Worker channel disconnected, exiting");
                    break;
                }
            }
        })
        .expect("Failed to spawn generation worker thread")
}
