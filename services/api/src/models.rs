//! Wire models for capsule request and response payloads

pub mod photo;
pub mod trip;
pub mod user;

pub use photo::{Photo, PhotoAuthor, PhotoUpload, UploadPhotosRequest, UploadPhotosResponse};
pub use trip::{
    CollectionDetail, SessionDetails, SessionInfo, Ship, Sighting, Trip, TripDetail, TripGuide,
    UserTrip, UserTrips,
};
pub use user::{
    BackendUser, InvitationResponse, SigninRequest, SigninResponse, SignupRequest, UserToken,
    ValidateInvitationRequest,
};
