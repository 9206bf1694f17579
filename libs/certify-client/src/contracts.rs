use ethers::contract::abigen;

abigen!(
    Certify,
    r"[
        function giveRightToPublish(address publisher, string calldata username) external
        function revokePublisher(address publisher) external
        function getPublisher(address publisher) external view returns (string memory)
        function isPublisher(address publisher) external view returns (bool)
        function getChairperson() external view returns (address, string memory)
        function publishCertificateToken(address recipient, uint8 v, bytes32 r, bytes32 s, string calldata certificateURI) external returns (uint256)
        function verifyCertificate(uint256 tokenId, bytes32 certificateHash, address signer) external view returns (bool, string memory)
        function splitSignature(bytes calldata signature) external pure returns (bytes32, bytes32, uint8)
        function certificateHash(string calldata certificateURI) external pure returns (bytes32)
        function getTokenCounter() external view returns (uint256)
        function tokenURI(uint256 tokenId) external view returns (string memory)
        function ownerOf(uint256 tokenId) external view returns (address)
        function publisherOf(uint256 tokenId) external view returns (address)
        event CertificatePublished(address indexed recipient, uint256 tokenId)
        event PublisherGranted(address indexed publisher, string username)
        event PublisherRevoked(address indexed publisher)
    ]"
);
