//! The connection to the X-Server

use crate::{
    display::{DisplayServer, FocusedWindow, Xid},
    error::Error,
    geometry::{Extents, Point, Rectangle},
    monitor::{self, Monitor},
    x::utils::XUtility,
};
use anyhow::{Context, Result};
use colored::Colorize;
use x11rb::{
    atom_manager,
    connection::{Connection, RequestConnection},
    protocol::{
        randr::{self, ConnectionExt as _},
        xproto::{
            self,
            AtomEnum,
            ConnectionExt as _,
            GetGeometryReply,
            MapState,
            QueryTreeReply,
        },
    },
    rust_connection::RustConnection,
};

// === Atoms === [[[

// An `Atom` is a unique ID corresponding to a string name that is used to
// identify properties. Only the ones `moveto` reads are interned. See
// https://specifications.freedesktop.org/wm-spec/wm-spec-latest.html#idm45381393900464
atom_manager! {
    pub(crate) Atoms: AtomsCookie {
        // Window ID of active window or none if no window is focused
        _NET_ACTIVE_WINDOW,
    }
}

// ]]] === Atoms ===

// ============================ XConnection =========================== [[[

/// The connection to the X-Server, open for the lifetime of one invocation
pub(crate) struct XConnection {
    /// Connection to the X-Server
    conn:   RustConnection,
    /// Screen number the connection is attached to
    screen: usize,
    /// The [`Atoms`] of the connection
    atoms:  Atoms,
}

impl XConnection {
    /// Connect to the X-Server named by `display`, or `$DISPLAY` when `None`
    pub(crate) fn new(display: Option<&str>) -> Result<Self> {
        log::trace!("creating a new `XConnection`");
        let (conn, screen) = XUtility::setup_connection(display)?;

        Self::check_extensions(&conn).context("failed to query extensions")?;

        log::debug!("interning Atoms");
        let atoms = Atoms::new(&conn)
            .context("failed to get `Atoms`")?
            .reply()
            .context("failed to get `Atoms` reply")?;

        Ok(Self { conn, screen, atoms })
    }

    // ========================= Accessor ========================= [[[

    /// Return the connection to the X-Server
    pub(crate) const fn aux(&self) -> &RustConnection {
        &self.conn
    }

    /// Return the `root` window
    pub(crate) fn root(&self) -> xproto::Window {
        self.aux().setup().roots[self.screen].root
    }

    // ]]] === Accessor ===

    // ========================== Helper ========================== [[[

    /// Check that the `randr` extension is installed and that its version is
    /// recent enough to list monitors
    fn check_extensions(conn: &RustConnection) -> Result<()> {
        log::debug!("checking that extensions are installed");
        if conn.extension_information(randr::X11_EXTENSION_NAME)?.is_none() {
            anyhow::bail!(
                "{} X11 extension is unsupported",
                randr::X11_EXTENSION_NAME.green().bold()
            );
        }

        let (min, max) = randr::X11_XML_VERSION;
        conn.randr_query_version(min, max)
            .context("failed to query `randr` version")?
            .reply()
            .with_context(|| {
                format!(
                    "`randr` version is unsupported. Supported versions: {}-{}",
                    min, max
                )
            })?;
        log::debug!("`randr` extension is up to date: {}-{}", min, max);

        Ok(())
    }

    /// Wrapper for getting a [`Window`](xproto::Window)'s geometry
    pub(crate) fn get_geometry(&self, window: Xid) -> Result<GetGeometryReply> {
        log::debug!("requesting a `GetGeometryReply` reply");
        self.aux()
            .get_geometry(window)
            .context("failed to get `GetGeometryReply`")?
            .reply()
            .context("failed to get `GetGeometryReply` reply")
    }

    /// Return result of querying the [`Window`](xproto::Window) tree
    pub(crate) fn query_tree(&self, window: Xid) -> Result<QueryTreeReply> {
        log::debug!("requesting a `QueryTreeReply` reply");
        self.aux()
            .query_tree(window)
            .context("failed to get `QueryTreeReply`")?
            .reply()
            .context("failed to get `QueryTreeReply` reply")
    }

    /// Get the currently active window's ID using `_NET_ACTIVE_WINDOW`
    pub(crate) fn get_active_window_id(&self) -> Result<Xid> {
        log::debug!("requesting property `_NET_ACTIVE_WINDOW`");
        Ok(self
            .aux()
            .get_property(
                false,
                self.root(),
                self.atoms._NET_ACTIVE_WINDOW,
                AtomEnum::WINDOW,
                0,
                u32::MAX,
            )
            .context("failed to get property: `_NET_ACTIVE_WINDOW`")?
            .reply()
            .context("failed to get property reply: `_NET_ACTIVE_WINDOW`")?
            .value32()
            .and_then(|mut i| i.next())
            .ok_or_else(|| Error::InvalidProperty(String::from("_NET_ACTIVE_WINDOW")))?)
    }

    /// Get the window that has the input focus. Prefers `_NET_ACTIVE_WINDOW`
    /// and falls back to the core protocol's input focus
    pub(crate) fn get_focused_window_id(&self) -> Result<Xid> {
        let window = match self.get_active_window_id() {
            Ok(window) => window,
            Err(e) => {
                log::debug!("falling back to `GetInputFocus`: {:#}", e);
                self.aux()
                    .get_input_focus()
                    .context("failed to get `GetInputFocusReply`")?
                    .reply()
                    .context("failed to get `GetInputFocusReply` reply")?
                    .focus
            },
        };

        // `None` and `PointerRoot` are 0 and 1
        if window <= 1 || window == self.root() {
            return Err(Error::NoFocusedWindow.into());
        }

        Ok(window)
    }

    /// Get the top-level ancestor of a [`Window`](xproto::Window). For a
    /// reparenting window manager this is the frame holding the decorations
    pub(crate) fn get_frame(&self, window: Xid) -> Result<Xid> {
        let root = self.root();
        let mut current = window;

        loop {
            let parent = self.query_tree(current)?.parent;
            if parent == root || parent == x11rb::NONE {
                log::debug!("Window({:#0x}) is framed by Window({:#0x})", window, current);
                return Ok(current);
            }
            current = parent;
        }
    }

    /// Get the [`Window`](xproto::Window)'s outer geometry (border
    /// included) in root coordinates
    pub(crate) fn get_window_geometry(&self, window: Xid) -> Result<Rectangle> {
        log::debug!("getting geometry for Window({:#0x})", window);
        let geom = self.get_geometry(window)?;

        // The geometry is relative to the parent, so translate the origin
        let trans = self
            .aux()
            .translate_coordinates(window, self.root(), 0, 0)
            .with_context(|| {
                format!(
                    "failed to get `TranslateCoordinatesReply` of Window({:#0x})",
                    window
                )
            })?
            .reply()
            .context("failed to get `TranslateCoordinatesReply` reply")?;

        let border = i32::from(geom.border_width);
        let rect = Rectangle::new(
            i32::from(trans.dst_x) - border,
            i32::from(trans.dst_y) - border,
            u32::from(geom.width) + 2 * border as u32,
            u32::from(geom.height) + 2 * border as u32,
        );
        log::debug!("Window({:#0x}): geometry: {}", window, rect);

        Ok(rect)
    }

    /// Top-left corners of the mapped top-level windows measuring exactly
    /// `tile` by `tile`. WindowMaker does not frame its dock, clip and
    /// appicons, so they show up as such tiles
    fn tiles(&self, tile: u32) -> Result<Vec<Point>> {
        let children = self.query_tree(self.root())?.children;
        log::trace!("scanning {} top-level windows for dock tiles", children.len());

        // Windows may vanish between the query and the replies, so failed
        // replies are skipped
        let cookies = children
            .iter()
            .map(|&window| self.aux().get_geometry(window))
            .collect::<Result<Vec<_>, _>>()
            .context("failed to get `GetGeometryReply`")?;

        let mut tiles = vec![];
        for (&window, cookie) in children.iter().zip(cookies) {
            let geom = match cookie.reply() {
                Ok(geom) => geom,
                Err(_) => continue,
            };
            if u32::from(geom.width) != tile || u32::from(geom.height) != tile {
                continue;
            }

            let viewable = self
                .aux()
                .get_window_attributes(window)
                .context("failed to get `GetWindowAttributesReply`")?
                .reply()
                .map_or(false, |attrs| attrs.map_state == MapState::VIEWABLE);
            if viewable {
                tiles.push(Point::new(geom.x.into(), geom.y.into()));
            }
        }

        log::debug!("found {} dock tiles", tiles.len());
        Ok(tiles)
    }

    /// Name of a RandR output
    fn output_name(info: &randr::GetOutputInfoReply) -> String {
        String::from_utf8_lossy(&info.name).into_owned()
    }

    // ]]] === Helper ===
}

// ]]] === XConnection ===

// ========================== DisplayServer =========================== [[[

impl DisplayServer for XConnection {
    fn monitors(&self) -> Result<Vec<Monitor>> {
        log::debug!("requesting `randr` screen resources");
        let resources = self
            .aux()
            .randr_get_screen_resources_current(self.root())
            .context("failed to get `GetScreenResourcesCurrentReply`")?
            .reply()
            .context("failed to get `GetScreenResourcesCurrentReply` reply")?;

        let primary = self
            .aux()
            .randr_get_output_primary(self.root())
            .context("failed to get `GetOutputPrimaryReply`")?
            .reply()
            .context("failed to get `GetOutputPrimaryReply` reply")?
            .output;

        let mut monitors = Vec::with_capacity(resources.outputs.len());
        for &output in &resources.outputs {
            let info = self
                .aux()
                .randr_get_output_info(output, resources.config_timestamp)
                .context("failed to get `GetOutputInfoReply`")?
                .reply()
                .context("failed to get `GetOutputInfoReply` reply")?;

            if info.connection != randr::Connection::CONNECTED || info.crtc == x11rb::NONE {
                log::trace!("skipping disabled output `{}`", Self::output_name(&info));
                continue;
            }

            let crtc = self
                .aux()
                .randr_get_crtc_info(info.crtc, resources.config_timestamp)
                .context("failed to get `GetCrtcInfoReply`")?
                .reply()
                .context("failed to get `GetCrtcInfoReply` reply")?;

            let monitor = Monitor::new(
                Self::output_name(&info),
                Rectangle::new(
                    crtc.x.into(),
                    crtc.y.into(),
                    crtc.width.into(),
                    crtc.height.into(),
                ),
                output == primary,
            );
            log::debug!(
                "found monitor {} at {}",
                monitor.name.green(),
                monitor.rectangle
            );
            monitors.push(monitor);
        }

        Ok(monitors)
    }

    fn focused_window(&self) -> Result<FocusedWindow> {
        let id = self.get_focused_window_id()?;
        let frame = self.get_frame(id)?;

        let client = self.get_window_geometry(id)?;
        let frame = self.get_window_geometry(frame)?;

        Ok(FocusedWindow {
            id,
            frame,
            extents: Extents::between(frame, client),
        })
    }

    // Under ICCCM's default north-west gravity the window manager puts the
    // frame's top-left corner where the client asks to be placed, so only the
    // size has to account for the decorations
    fn place_window(&self, window: &FocusedWindow, rect: Rectangle) -> Result<()> {
        let client = Rectangle {
            point:     rect.point,
            dimension: (rect - window.extents).dimension,
        };
        log::debug!("placing Window({:#0x}): {}", window.id, client);

        self.aux()
            .configure_window(window.id, &client.to_aux())
            .with_context(|| format!("failed to place Window({:#0x})", window.id))?
            .check()
            .with_context(|| format!("failed to check placing Window({:#0x})", window.id))?;

        Ok(())
    }

    fn pointer_position(&self) -> Result<Point> {
        log::debug!("getting pointer position");
        let reply = self
            .aux()
            .query_pointer(self.root())
            .context("failed to get `QueryPointerReply`")?
            .reply()
            .context("failed to get `QueryPointerReply` reply")?;

        Ok(Point::new(reply.root_x.into(), reply.root_y.into()))
    }

    fn dock_column(&self, tile: u32) -> Result<Option<i32>> {
        let column = monitor::dock_column(self.tiles(tile)?);
        log::debug!("predicted dock column: {:?}", column);

        Ok(column)
    }

    fn warp_pointer(&self, pnt: Point) -> Result<()> {
        log::debug!("warping pointer using Point: {}", pnt);
        self.aux()
            .warp_pointer(
                x11rb::NONE,
                self.root(),
                0,
                0,
                0,
                0,
                pnt.x as i16,
                pnt.y as i16,
            )
            .context("failed to `warp_pointer`")?
            .check()
            .context("failed to check warping pointer")?;

        Ok(())
    }
}

// ]]] === DisplayServer ===

impl Drop for XConnection {
    fn drop(&mut self) {
        log::trace!("closing the connection to the X-Server");
        if let Err(e) = self.conn.flush() {
            log::warn!("failed to flush the X11 connection: {}", e);
        }
    }
}

// vim: ft=rust:et:sw=4:ts=2:sts=4:tw=99:fdm=marker:fmr=[[[,]]]:
