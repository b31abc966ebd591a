//! In-process MCP peers for unit tests.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rmcp::model::{ClientInfo, ProtocolVersion, ServerJsonRpcMessage};
use rmcp::service::{
    serve_directly, ClientInitializeError, RoleClient, RxJsonRpcMessage, ServiceExt,
    TxJsonRpcMessage,
};
use rmcp::transport::Transport as RmcpTransport;
use serde_json::json;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::transport::{MCPRunningService, MCPTransport};

/// How the scripted server answers requests.
#[derive(Debug, Clone)]
pub(crate) enum ScriptedServer {
    /// `tools/list` returns one tool; `tools/call` echoes its arguments as text.
    Echo { tool_name: String },
    /// `tools/call` returns an error result carrying `message`.
    ToolError { message: String },
    /// The server goes away on the first request.
    Disconnect,
}

struct ChannelRmcpTransport {
    outbound: UnboundedSender<TxJsonRpcMessage<RoleClient>>,
    inbound: UnboundedReceiver<RxJsonRpcMessage<RoleClient>>,
}

impl RmcpTransport<RoleClient> for ChannelRmcpTransport {
    type Error = io::Error;

    fn send(
        &mut self,
        item: TxJsonRpcMessage<RoleClient>,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send + 'static {
        let tx = self.outbound.clone();
        async move {
            tx.send(item).map_err(|_| {
                io::Error::new(io::ErrorKind::BrokenPipe, "scripted rmcp channel closed")
            })
        }
    }

    async fn receive(&mut self) -> Option<RxJsonRpcMessage<RoleClient>> {
        self.inbound.recv().await
    }

    fn close(&mut self) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send {
        self.inbound.close();
        std::future::ready(Ok(()))
    }
}

fn respond(id: serde_json::Value, result: serde_json::Value) -> ServerJsonRpcMessage {
    serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    }))
    .expect("scripted response should deserialize")
}

/// Running rmcp client session wired to a scripted server task.
///
/// Must be called from inside a Tokio runtime; the server task and the rmcp
/// service loop are spawned onto it.
pub(crate) fn scripted_running_service(server: ScriptedServer) -> MCPRunningService {
    let (outbound_tx, mut outbound_rx) = unbounded_channel::<TxJsonRpcMessage<RoleClient>>();
    let (inbound_tx, inbound_rx) = unbounded_channel::<RxJsonRpcMessage<RoleClient>>();
    let transport = ChannelRmcpTransport {
        outbound: outbound_tx,
        inbound: inbound_rx,
    };

    tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let Ok(value) = serde_json::to_value(message) else {
                continue;
            };
            let Some(method) = value.get("method").and_then(|m| m.as_str()) else {
                continue;
            };
            let id = value.get("id").cloned().unwrap_or(serde_json::Value::Null);

            let response = match (&server, method) {
                (ScriptedServer::Disconnect, _) => return,
                (ScriptedServer::Echo { tool_name }, "tools/list") => respond(
                    id,
                    json!({
                        "tools": [{
                            "name": tool_name,
                            "description": "scripted tool",
                            "inputSchema": { "type": "object", "properties": {} }
                        }],
                        "nextCursor": null
                    }),
                ),
                (ScriptedServer::Echo { .. }, "tools/call") => {
                    let arguments = value
                        .pointer("/params/arguments")
                        .cloned()
                        .unwrap_or(serde_json::Value::Null);
                    respond(
                        id,
                        json!({
                            "content": [{ "type": "text", "text": arguments.to_string() }],
                            "isError": false
                        }),
                    )
                }
                (ScriptedServer::ToolError { message }, "tools/call") => respond(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": message }],
                        "isError": true
                    }),
                ),
                _ => continue,
            };
            let _ = inbound_tx.send(response);
        }
    });

    serve_directly(().into_dyn(), transport, None)
}

/// Transport whose `connect` replays queued outcomes.
///
/// A queued [`ScriptedServer`] is turned into a running session at connect
/// time, so the session lives on whichever runtime performs the connect.
pub(crate) struct MockBootstrapTransport {
    outcomes: VecDeque<Result<ScriptedServer, ClientInitializeError>>,
    attempted_protocols: Arc<Mutex<Vec<ProtocolVersion>>>,
}

impl MockBootstrapTransport {
    pub(crate) fn new(outcomes: Vec<Result<ScriptedServer, ClientInitializeError>>) -> Self {
        Self {
            outcomes: outcomes.into(),
            attempted_protocols: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn serving(server: ScriptedServer) -> Self {
        Self::new(vec![Ok(server)])
    }

    pub(crate) fn attempted_protocols(&self) -> Arc<Mutex<Vec<ProtocolVersion>>> {
        Arc::clone(&self.attempted_protocols)
    }
}

#[async_trait]
impl MCPTransport for MockBootstrapTransport {
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError> {
        self.attempted_protocols
            .lock()
            .expect("protocol mutex should lock")
            .push(client_info.protocol_version);

        match self.outcomes.pop_front() {
            Some(Ok(server)) => Ok(scripted_running_service(server)),
            Some(Err(error)) => Err(error),
            None => Err(ClientInitializeError::ConnectionClosed(
                "missing mock connect result".into(),
            )),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}
